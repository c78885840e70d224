use crate::{LiftoffService, Result};

impl LiftoffService {
	/// Discards the user's session. Ending a missing session is not an error; the return value
	/// says whether anything was removed.
	pub async fn end_session(&self, user_id: &str) -> Result<bool> {
		let user_id = crate::normalize_user_id(user_id)?;
		let _guard = self.gates.acquire(user_id).await;
		let removed = self.store.remove(user_id).await?;

		if removed {
			tracing::info!(user_id, "Search session ended.");
		}

		Ok(removed)
	}
}
