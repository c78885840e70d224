use std::{future::Future, time::Duration};

use crate::Result;

/// Bounded exponential backoff. Attempt `n` (1-based) that fails transiently waits
/// `base_delay * multiplier^(n-1)`, capped at `max_delay`, before attempt `n + 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryPolicy {
	pub max_attempts: u32,
	pub base_delay: Duration,
	pub multiplier: f64,
	pub max_delay: Duration,
}
impl RetryPolicy {
	pub fn from_config(cfg: &liftoff_config::Retry) -> Self {
		Self {
			max_attempts: cfg.max_attempts.max(1),
			base_delay: Duration::from_millis(cfg.base_delay_ms),
			multiplier: cfg.multiplier,
			max_delay: Duration::from_millis(cfg.max_delay_ms),
		}
	}

	pub fn delay_after(&self, attempt: u32) -> Duration {
		let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
		let millis = self.base_delay.as_millis() as f64 * self.multiplier.powi(exponent);

		if !millis.is_finite() || millis >= self.max_delay.as_millis() as f64 {
			return self.max_delay;
		}

		Duration::from_millis(millis.round() as u64)
	}

	pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T>
	where
		F: FnMut() -> Fut,
		Fut: Future<Output = Result<T>>,
	{
		let mut attempt = 1;

		loop {
			match op().await {
				Ok(value) => return Ok(value),
				Err(err) if err.is_transient() && attempt < self.max_attempts => {
					let delay = self.delay_after(attempt);

					tracing::warn!(
						error = %err,
						attempt,
						max_attempts = self.max_attempts,
						delay_ms = delay.as_millis() as u64,
						"{label} failed; retrying."
					);
					tokio::time::sleep(delay).await;

					attempt += 1;
				},
				Err(err) => return Err(err),
			}
		}
	}
}
impl Default for RetryPolicy {
	fn default() -> Self {
		Self::from_config(&liftoff_config::Retry::default())
	}
}
