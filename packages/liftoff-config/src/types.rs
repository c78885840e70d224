use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub source: Source,
	pub session: Session,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

/// Where frames come from.
#[derive(Debug, Clone, Deserialize)]
pub struct Source {
	/// Base URL of the FrameX-style API, normalized to end with `/`.
	pub api_base: String,
	/// Video searched when a start request does not name one.
	pub video_id: String,
	/// Per HTTP attempt.
	pub timeout_ms: u64,
	#[serde(default)]
	pub retry: Retry,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Retry {
	pub max_attempts: u32,
	pub base_delay_ms: u64,
	pub multiplier: f64,
	pub max_delay_ms: u64,
}
impl Default for Retry {
	fn default() -> Self {
		Self { max_attempts: 3, base_delay_ms: 200, multiplier: 2.0, max_delay_ms: 5_000 }
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Session {
	pub idle_ttl_seconds: u64,
	pub sweep_interval_seconds: u64,
	/// Deadline for one frame source call, retries included.
	pub call_timeout_ms: u64,
	/// Safety cap on answers per session. When absent the cap is derived from the frame count.
	pub max_steps: Option<u32>,
}
impl Session {
	pub fn idle_ttl(&self) -> Duration {
		Duration::from_secs(self.idle_ttl_seconds)
	}

	pub fn sweep_interval(&self) -> Duration {
		Duration::from_secs(self.sweep_interval_seconds)
	}

	pub fn call_timeout(&self) -> Duration {
		Duration::from_millis(self.call_timeout_ms)
	}
}

fn default_log_level() -> String {
	"info".to_string()
}
