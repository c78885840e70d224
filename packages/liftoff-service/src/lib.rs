pub mod answer;
pub mod end;
pub mod start;
pub mod status;
pub mod sweep;
pub mod view;

mod error;
mod gate;

pub use error::{Error, Result};
pub use liftoff_storage::BoxFuture;
pub use sweep::Sweeper;
pub use view::SessionView;

use std::{future::Future, sync::Arc};

use liftoff_config::Config;
use liftoff_providers::{FramexClient, VideoInfo};
use liftoff_storage::{MemoryStore, SessionStore};

use crate::gate::UserGates;

/// Where video metadata and frame images come from.
pub trait FrameSource
where
	Self: Send + Sync,
{
	fn video_info<'a>(&'a self, video_id: &'a str) -> BoxFuture<'a, color_eyre::Result<VideoInfo>>;

	fn frame_image<'a>(
		&'a self,
		video_id: &'a str,
		frame_index: u64,
	) -> BoxFuture<'a, color_eyre::Result<Vec<u8>>>;
}

pub struct LiftoffService {
	pub cfg: Config,
	pub store: Arc<dyn SessionStore>,
	pub source: Arc<dyn FrameSource>,
	gates: UserGates,
}
impl LiftoffService {
	/// Wires the HTTP frame source and the in-memory store described by `cfg`.
	pub fn new(cfg: Config) -> Result<Self> {
		let source = FramexClient::new(&cfg.source)?;

		Ok(Self::with_parts(cfg, Arc::new(MemoryStore::new()), Arc::new(source)))
	}

	pub fn with_parts(
		cfg: Config,
		store: Arc<dyn SessionStore>,
		source: Arc<dyn FrameSource>,
	) -> Self {
		Self { cfg, store, source, gates: UserGates::default() }
	}

	/// Runs one frame-source call under the session call timeout. Failures and timeouts both
	/// surface as [`Error::SourceUnavailable`].
	pub(crate) async fn call_source<T, F>(&self, what: &str, call: F) -> Result<T>
	where
		F: Future<Output = color_eyre::Result<T>>,
	{
		let timeout = self.cfg.session.call_timeout();

		match tokio::time::timeout(timeout, call).await {
			Ok(Ok(value)) => Ok(value),
			Ok(Err(err)) => {
				tracing::warn!(error = %err, "{what} failed.");

				Err(Error::SourceUnavailable { message: format!("{what} failed: {err}") })
			},
			Err(_) => {
				tracing::warn!(timeout_ms = timeout.as_millis() as u64, "{what} timed out.");

				Err(Error::SourceUnavailable {
					message: format!("{what} timed out after {} ms.", timeout.as_millis()),
				})
			},
		}
	}
}

impl FrameSource for FramexClient {
	fn video_info<'a>(&'a self, video_id: &'a str) -> BoxFuture<'a, color_eyre::Result<VideoInfo>> {
		Box::pin(async move { Ok(FramexClient::video_info(self, video_id).await?) })
	}

	fn frame_image<'a>(
		&'a self,
		video_id: &'a str,
		frame_index: u64,
	) -> BoxFuture<'a, color_eyre::Result<Vec<u8>>> {
		Box::pin(async move { Ok(FramexClient::frame_image(self, video_id, frame_index).await?) })
	}
}

pub(crate) fn normalize_user_id(user_id: &str) -> Result<&str> {
	let user_id = user_id.trim();

	if user_id.is_empty() {
		return Err(Error::InvalidRequest { message: "user_id must be non-empty.".to_string() });
	}

	Ok(user_id)
}
