use std::sync::Arc;

use time::OffsetDateTime;
use tokio::{
	sync::oneshot,
	task::JoinHandle,
	time::{Instant, MissedTickBehavior},
};

use crate::{LiftoffService, Result};

impl LiftoffService {
	/// Drops every session idle for longer than the configured TTL, as seen at `now`.
	pub async fn sweep_expired(&self, now: OffsetDateTime) -> Result<usize> {
		let removed = self.store.sweep_expired(now, self.cfg.session.idle_ttl()).await?;
		let pruned = self.gates.prune();

		if removed > 0 {
			tracing::info!(removed, pruned_gates = pruned, "Expired search sessions swept.");
		} else {
			tracing::debug!(pruned_gates = pruned, "No expired search sessions.");
		}

		Ok(removed)
	}
}

/// Background task that sweeps expired sessions every `session.sweep_interval_seconds`.
pub struct Sweeper {
	shutdown: Option<oneshot::Sender<()>>,
	handle: JoinHandle<()>,
}
impl Sweeper {
	pub fn spawn(service: Arc<LiftoffService>) -> Self {
		let period = service.cfg.session.sweep_interval();
		let (shutdown, mut stop) = oneshot::channel();
		let handle = tokio::spawn(async move {
			let mut ticker = tokio::time::interval_at(Instant::now() + period, period);

			ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

			loop {
				tokio::select! {
					_ = &mut stop => break,
					_ = ticker.tick() => {
						if let Err(err) = service.sweep_expired(OffsetDateTime::now_utc()).await {
							tracing::error!(error = %err, "Session sweep failed.");
						}
					},
				}
			}

			tracing::debug!("Session sweeper stopped.");
		});

		Self { shutdown: Some(shutdown), handle }
	}

	pub async fn shutdown(mut self) {
		if let Some(shutdown) = self.shutdown.take() {
			let _ = shutdown.send(());
		}
		if let Err(err) = self.handle.await {
			tracing::error!(error = %err, "Session sweeper task failed.");
		}
	}
}
