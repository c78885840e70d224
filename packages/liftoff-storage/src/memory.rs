use std::time::Duration;

use dashmap::DashMap;
use time::OffsetDateTime;

use liftoff_domain::session::SearchSession;

use crate::{BoxFuture, Error, Result, SessionStore};

/// Process-local store. Sessions live in a sharded map, so writers for different users only
/// contend when their keys share a shard, and then only for the duration of a map operation.
#[derive(Debug, Default)]
pub struct MemoryStore {
	sessions: DashMap<String, SearchSession>,
}
impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.sessions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.sessions.is_empty()
	}

	fn put_sync(&self, session: SearchSession) -> Result<()> {
		if session.user_id.trim().is_empty() {
			return Err(Error::InvalidArgument("user_id must be non-empty.".to_string()));
		}

		self.sessions.insert(session.user_id.clone(), session);

		Ok(())
	}

	fn touch_sync(&self, user_id: &str, now: OffsetDateTime) -> Option<SearchSession> {
		let mut entry = self.sessions.get_mut(user_id)?;

		entry.touch(now);

		Some(entry.value().clone())
	}

	fn sweep_sync(&self, now: OffsetDateTime, ttl: Duration) -> usize {
		let mut removed = 0;

		self.sessions.retain(|_, session| {
			let keep = !session.is_idle(now, ttl);

			if !keep {
				removed += 1;
			}

			keep
		});

		removed
	}
}

impl SessionStore for MemoryStore {
	fn put<'a>(&'a self, session: SearchSession) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move { self.put_sync(session) })
	}

	fn get<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, Result<Option<SearchSession>>> {
		Box::pin(async move { Ok(self.sessions.get(user_id).map(|entry| entry.value().clone())) })
	}

	fn touch<'a>(
		&'a self,
		user_id: &'a str,
		now: OffsetDateTime,
	) -> BoxFuture<'a, Result<Option<SearchSession>>> {
		Box::pin(async move { Ok(self.touch_sync(user_id, now)) })
	}

	fn remove<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, Result<bool>> {
		Box::pin(async move { Ok(self.sessions.remove(user_id).is_some()) })
	}

	fn sweep_expired<'a>(
		&'a self,
		now: OffsetDateTime,
		ttl: Duration,
	) -> BoxFuture<'a, Result<usize>> {
		Box::pin(async move { Ok(self.sweep_sync(now, ttl)) })
	}
}
