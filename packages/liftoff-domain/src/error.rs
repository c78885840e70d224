use crate::session::SessionStatus;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("A frame sequence needs at least one frame; got {total_frames}.")]
	InvalidRange { total_frames: u64 },
	#[error("Session is not in progress (status: {status:?}).")]
	NotInProgress { status: SessionStatus },
}
