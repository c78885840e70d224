use time::OffsetDateTime;

use liftoff_domain::session::SearchSession;

use crate::{Error, LiftoffService, Result, SessionView};

impl LiftoffService {
	/// Starts a search for `user_id`, replacing any session the user already had. `video_id`
	/// falls back to the configured default.
	///
	/// Nothing is stored unless both the metadata and the first probe image were fetched.
	pub async fn start_search(&self, user_id: &str, video_id: Option<&str>) -> Result<SessionView> {
		let user_id = crate::normalize_user_id(user_id)?;
		let video_id = video_id
			.map(str::trim)
			.filter(|video_id| !video_id.is_empty())
			.unwrap_or(self.cfg.source.video_id.as_str());
		let _guard = self
			.gates
			.try_acquire(user_id)
			.ok_or_else(|| Error::ConcurrentModification { user_id: user_id.to_string() })?;
		let info = self.call_source("Video info request", self.source.video_info(video_id)).await?;
		let session = SearchSession::start(
			user_id,
			video_id,
			info.total_frames,
			info.frame_rate,
			self.cfg.session.max_steps,
			OffsetDateTime::now_utc(),
		)
		.map_err(|err| Error::InvalidRange { message: format!("{video_id}: {err}") })?;
		let view = SessionView::from_session(&session);
		let Some(probe) = session.current_probe else {
			return Err(Error::InvalidRange {
				message: format!("{video_id}: no frame to probe."),
			});
		};
		let image =
			self.call_source("Frame image request", self.source.frame_image(video_id, probe)).await?;

		self.store.put(session).await?;

		tracing::info!(
			user_id,
			video_id,
			total_frames = info.total_frames,
			probe,
			"Search session started."
		);

		Ok(view.with_image(image))
	}
}
