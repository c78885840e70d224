pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{0}")]
	Message(String),

	#[error("Unknown video {0}.")]
	UnknownVideo(String),

	#[error("Frame {frame_index} is outside {video_id}.")]
	FrameOutOfRange { video_id: String, frame_index: u64 },
}
