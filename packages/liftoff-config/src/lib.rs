mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Retry, Service, Session, Source};

use std::{env, fs, path::Path};

pub const ENV_API_BASE: &str = "LIFTOFF_API_BASE";
pub const ENV_VIDEO_ID: &str = "LIFTOFF_VIDEO_ID";
pub const ENV_LOG_LEVEL: &str = "LIFTOFF_LOG_LEVEL";
pub const ENV_IDLE_TTL_SECONDS: &str = "LIFTOFF_IDLE_TTL_SECONDS";

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	apply_overrides(&mut cfg, |key| env::var(key).ok())?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

/// Applies environment overrides on top of the file values. `lookup` is `std::env::var` outside of
/// tests.
pub fn apply_overrides<F>(cfg: &mut Config, lookup: F) -> Result<()>
where
	F: Fn(&str) -> Option<String>,
{
	if let Some(api_base) = lookup(ENV_API_BASE) {
		cfg.source.api_base = api_base;
	}
	if let Some(video_id) = lookup(ENV_VIDEO_ID) {
		cfg.source.video_id = video_id;
	}
	if let Some(log_level) = lookup(ENV_LOG_LEVEL) {
		cfg.service.log_level = log_level;
	}
	if let Some(raw) = lookup(ENV_IDLE_TTL_SECONDS) {
		cfg.session.idle_ttl_seconds = raw.trim().parse().map_err(|_| Error::InvalidOverride {
			key: ENV_IDLE_TTL_SECONDS,
			message: format!("expected a whole number of seconds, got {raw:?}."),
		})?;
	}

	Ok(())
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}

	let api_base = cfg.source.api_base.as_str();

	if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
		return Err(Error::Validation {
			message: "source.api_base must be an http or https URL.".to_string(),
		});
	}
	if cfg.source.video_id.trim().is_empty() {
		return Err(Error::Validation {
			message: "source.video_id must be non-empty.".to_string(),
		});
	}
	if cfg.source.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "source.timeout_ms must be greater than zero.".to_string(),
		});
	}

	let retry = &cfg.source.retry;

	if retry.max_attempts == 0 {
		return Err(Error::Validation {
			message: "source.retry.max_attempts must be greater than zero.".to_string(),
		});
	}
	if !retry.multiplier.is_finite() {
		return Err(Error::Validation {
			message: "source.retry.multiplier must be a finite number.".to_string(),
		});
	}
	if retry.multiplier < 1.0 {
		return Err(Error::Validation {
			message: "source.retry.multiplier must be 1.0 or greater.".to_string(),
		});
	}
	if retry.max_delay_ms < retry.base_delay_ms {
		return Err(Error::Validation {
			message: "source.retry.max_delay_ms must be at least source.retry.base_delay_ms."
				.to_string(),
		});
	}
	if cfg.session.idle_ttl_seconds == 0 {
		return Err(Error::Validation {
			message: "session.idle_ttl_seconds must be greater than zero.".to_string(),
		});
	}
	if cfg.session.sweep_interval_seconds == 0 {
		return Err(Error::Validation {
			message: "session.sweep_interval_seconds must be greater than zero.".to_string(),
		});
	}
	if cfg.session.call_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "session.call_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if let Some(max_steps) = cfg.session.max_steps
		&& max_steps == 0
	{
		return Err(Error::Validation {
			message: "session.max_steps must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let api_base = cfg.source.api_base.trim();

	cfg.source.api_base =
		if api_base.ends_with('/') { api_base.to_string() } else { format!("{api_base}/") };
	cfg.source.video_id = cfg.source.video_id.trim().to_string();

	if cfg.service.log_level.trim().is_empty() {
		cfg.service.log_level = "info".to_string();
	}
}
