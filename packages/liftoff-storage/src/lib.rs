pub mod memory;

mod error;

pub use error::Error;
pub use memory::MemoryStore;

use std::{future::Future, pin::Pin, time::Duration};

use time::OffsetDateTime;

use liftoff_domain::session::SearchSession;

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Keyed by user id. Every call is atomic for its key; calls on different keys must not wait on
/// each other.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Inserts the session under its `user_id`, replacing whatever was there.
	fn put<'a>(&'a self, session: SearchSession) -> BoxFuture<'a, Result<()>>;

	fn get<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, Result<Option<SearchSession>>>;

	/// Refreshes `last_activity_at` and returns the refreshed session.
	fn touch<'a>(
		&'a self,
		user_id: &'a str,
		now: OffsetDateTime,
	) -> BoxFuture<'a, Result<Option<SearchSession>>>;

	/// Returns whether a session was removed.
	fn remove<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, Result<bool>>;

	/// Removes every session idle for longer than `ttl` and returns how many went.
	fn sweep_expired<'a>(
		&'a self,
		now: OffsetDateTime,
		ttl: Duration,
	) -> BoxFuture<'a, Result<usize>>;
}
