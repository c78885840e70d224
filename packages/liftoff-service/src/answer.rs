use time::OffsetDateTime;

use liftoff_domain::session::{Advance, SessionStatus};

use crate::{Error, LiftoffService, Result, SessionView};

impl LiftoffService {
	/// Records whether the event is visible at the current probe.
	///
	/// The answer is only committed after the next image is in hand, so a failed or timed-out
	/// fetch leaves the session exactly where it was and the same answer can be sent again.
	pub async fn submit_answer(&self, user_id: &str, launched: bool) -> Result<SessionView> {
		let user_id = crate::normalize_user_id(user_id)?;
		let _guard = self
			.gates
			.try_acquire(user_id)
			.ok_or_else(|| Error::ConcurrentModification { user_id: user_id.to_string() })?;
		let now = OffsetDateTime::now_utc();
		let Some(session) = self.store.touch(user_id, now).await? else {
			return Err(Error::NoActiveSession { user_id: user_id.to_string() });
		};
		let Advance { session: next, step_limit_exceeded } = session
			.advance(launched, now)
			.map_err(|_| Error::NoActiveSession { user_id: user_id.to_string() })?;

		if step_limit_exceeded {
			tracing::warn!(
				user_id,
				video_id = %next.video_id,
				step_count = next.step_count,
				bounds = ?next.bounds,
				"Search hit its step limit without settling."
			);

			let step_limit = next.step_limit;

			self.store.put(next).await?;

			return Err(Error::StepLimitExceeded { user_id: user_id.to_string(), step_limit });
		}

		let frame = match next.status {
			SessionStatus::InProgress => next.current_probe,
			SessionStatus::Found => next.result_frame,
			SessionStatus::Exhausted => None,
		};
		let image = match frame {
			Some(frame) => Some(
				self.call_source(
					"Frame image request",
					self.source.frame_image(&next.video_id, frame),
				)
				.await?,
			),
			None => None,
		};
		let view = SessionView::from_session(&next);

		match next.status {
			SessionStatus::InProgress => tracing::debug!(
				user_id,
				launched,
				step_count = next.step_count,
				probe = ?next.current_probe,
				"Answer recorded."
			),
			SessionStatus::Found | SessionStatus::Exhausted => tracing::info!(
				user_id,
				status = ?next.status,
				result_frame = ?next.result_frame,
				step_count = next.step_count,
				"Search settled."
			),
		}

		self.store.put(next).await?;

		Ok(match image {
			Some(image) => view.with_image(image),
			None => view,
		})
	}
}
