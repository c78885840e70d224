use time::OffsetDateTime;

use crate::{Error, LiftoffService, Result, SessionView};

impl LiftoffService {
	/// Reports the session without fetching anything. Counts as activity for idle expiry but is
	/// otherwise read-only, so it does not wait on the user's gate.
	pub async fn get_status(&self, user_id: &str) -> Result<SessionView> {
		let user_id = crate::normalize_user_id(user_id)?;

		match self.store.touch(user_id, OffsetDateTime::now_utc()).await? {
			Some(session) => Ok(SessionView::from_session(&session)),
			None => Err(Error::NoActiveSession { user_id: user_id.to_string() }),
		}
	}
}
