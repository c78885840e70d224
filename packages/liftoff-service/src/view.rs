use liftoff_domain::session::{SearchSession, SessionStatus};

/// What a caller gets back after every operation.
///
/// `current_probe_image` accompanies an in-progress probe and `result_image` a found launch frame.
/// Status queries carry neither.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionView {
	pub user_id: String,
	pub video_id: String,
	pub status: SessionStatus,
	pub total_frames: u64,
	pub current_probe: Option<u64>,
	pub current_probe_image: Option<Vec<u8>>,
	pub step_count: u32,
	pub estimated_remaining_steps: Option<u32>,
	pub progress_percent: u8,
	pub result_frame: Option<u64>,
	pub result_timestamp: Option<f64>,
	pub result_image: Option<Vec<u8>>,
}
impl SessionView {
	pub fn from_session(session: &SearchSession) -> Self {
		Self {
			user_id: session.user_id.clone(),
			video_id: session.video_id.clone(),
			status: session.status,
			total_frames: session.total_frames,
			current_probe: session.current_probe,
			current_probe_image: None,
			step_count: session.step_count,
			estimated_remaining_steps: session.estimated_remaining_steps(),
			progress_percent: session.progress_percent(),
			result_frame: session.result_frame,
			result_timestamp: session.result_timestamp(),
			result_image: None,
		}
	}

	/// Attaches `image` to whichever frame the session currently points at.
	pub(crate) fn with_image(mut self, image: Vec<u8>) -> Self {
		match self.status {
			SessionStatus::InProgress => self.current_probe_image = Some(image),
			SessionStatus::Found => self.result_image = Some(image),
			SessionStatus::Exhausted => {},
		}

		self
	}
}
