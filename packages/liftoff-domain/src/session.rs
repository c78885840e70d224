use std::time::Duration;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
	Error, Result,
	bisection::{self, Bounds, Resolution, Transition},
};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
	InProgress,
	Found,
	Exhausted,
}
impl SessionStatus {
	pub fn is_terminal(self) -> bool {
		!matches!(self, Self::InProgress)
	}
}

/// One user's bisection over one video.
///
/// `bounds` is the open range while the search is in progress and the last open range once it has
/// settled. `current_probe` is present exactly while the status is [`SessionStatus::InProgress`].
#[derive(Clone, Debug, PartialEq)]
pub struct SearchSession {
	pub user_id: String,
	pub video_id: String,
	pub total_frames: u64,
	pub frame_rate: Option<f64>,
	pub bounds: Bounds,
	pub current_probe: Option<u64>,
	pub step_count: u32,
	pub step_limit: u32,
	pub status: SessionStatus,
	pub result_frame: Option<u64>,
	pub created_at: OffsetDateTime,
	pub last_activity_at: OffsetDateTime,
}
impl SearchSession {
	/// Builds a fresh in-progress session with its first probe chosen. A missing `step_limit`
	/// falls back to the worst case for `total_frames`.
	pub fn start(
		user_id: impl Into<String>,
		video_id: impl Into<String>,
		total_frames: u64,
		frame_rate: Option<f64>,
		step_limit: Option<u32>,
		now: OffsetDateTime,
	) -> Result<Self> {
		let bounds = bisection::initial_bounds(total_frames)?;

		Ok(Self {
			user_id: user_id.into(),
			video_id: video_id.into(),
			total_frames,
			frame_rate: frame_rate.filter(|rate| rate.is_finite() && *rate > 0.0),
			bounds,
			current_probe: Some(bisection::next_probe(bounds)),
			step_count: 0,
			step_limit: step_limit.unwrap_or_else(|| bisection::max_steps(total_frames)),
			status: SessionStatus::InProgress,
			result_frame: None,
			created_at: now,
			last_activity_at: now,
		})
	}

	/// Returns the session as it would be after `launched` is recorded for the current probe.
	/// `self` is left untouched so callers can discard the result if a later step fails.
	pub fn advance(&self, launched: bool, now: OffsetDateTime) -> Result<Advance> {
		let Some(probe) = self.current_probe.filter(|_| self.status == SessionStatus::InProgress)
		else {
			return Err(Error::NotInProgress { status: self.status });
		};
		let mut next = self.clone();

		next.step_count += 1;
		next.last_activity_at = now;

		match bisection::apply_answer(self.bounds, probe, launched) {
			Transition::Narrowed(bounds) if next.step_count >= next.step_limit => {
				next.bounds = bounds;
				next.settle(Resolution::Exhausted);

				Ok(Advance { session: next, step_limit_exceeded: true })
			},
			Transition::Narrowed(bounds) => {
				next.bounds = bounds;
				next.current_probe = Some(bisection::next_probe(bounds));

				Ok(Advance { session: next, step_limit_exceeded: false })
			},
			Transition::Settled { boundary } => {
				next.settle(bisection::resolve(boundary, self.total_frames));

				Ok(Advance { session: next, step_limit_exceeded: false })
			},
		}
	}

	pub fn touch(&mut self, now: OffsetDateTime) {
		if now > self.last_activity_at {
			self.last_activity_at = now;
		}
	}

	pub fn is_idle(&self, now: OffsetDateTime, ttl: Duration) -> bool {
		now - self.last_activity_at > ttl
	}

	pub fn estimated_remaining_steps(&self) -> Option<u32> {
		match self.status {
			SessionStatus::InProgress => Some(bisection::estimated_remaining_steps(self.bounds)),
			SessionStatus::Found | SessionStatus::Exhausted => None,
		}
	}

	pub fn progress_percent(&self) -> u8 {
		match self.estimated_remaining_steps() {
			Some(remaining) => bisection::progress_percent(self.step_count, remaining),
			None => 100,
		}
	}

	/// Seconds from the start of the video to the result frame. Only known when the source
	/// reported a frame rate.
	pub fn result_timestamp(&self) -> Option<f64> {
		let frame = self.result_frame?;
		let rate = self.frame_rate?;

		Some(frame as f64 / rate)
	}

	fn settle(&mut self, resolution: Resolution) {
		self.current_probe = None;

		match resolution {
			Resolution::Found(frame) => {
				self.status = SessionStatus::Found;
				self.result_frame = Some(frame);
			},
			Resolution::Exhausted => {
				self.status = SessionStatus::Exhausted;
				self.result_frame = None;
			},
		}
	}
}

#[derive(Clone, Debug)]
pub struct Advance {
	pub session: SearchSession,
	pub step_limit_exceeded: bool,
}
