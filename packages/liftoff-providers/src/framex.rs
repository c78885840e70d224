use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Deserializer};

use crate::{Error, Result, RetryPolicy};

/// Video metadata as served by `GET {api_base}video/{video}/`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct VideoInfo {
	#[serde(default)]
	pub name: Option<String>,
	#[serde(rename = "frames")]
	pub total_frames: u64,
	/// Frames per second. The API reports either a plain number or a `[numerator, denominator]`
	/// pair; anything unusable becomes `None`.
	#[serde(default, deserialize_with = "deserialize_frame_rate")]
	pub frame_rate: Option<f64>,
	#[serde(default)]
	pub width: Option<u32>,
	#[serde(default)]
	pub height: Option<u32>,
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub first_frame: Option<String>,
	#[serde(default)]
	pub last_frame: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFrameRate {
	Number(f64),
	Ratio(Vec<f64>),
}
impl RawFrameRate {
	fn frames_per_second(self) -> Option<f64> {
		let fps = match self {
			Self::Number(value) => value,
			Self::Ratio(parts) => match parts.as_slice() {
				[value] => *value,
				[numerator, denominator] if *denominator != 0.0 => numerator / denominator,
				_ => return None,
			},
		};

		(fps.is_finite() && fps > 0.0).then_some(fps)
	}
}

/// HTTP client for a FrameX-style frame API.
#[derive(Clone, Debug)]
pub struct FramexClient {
	client: Client,
	api_base: Url,
	retry: RetryPolicy,
}
impl FramexClient {
	pub fn new(cfg: &liftoff_config::Source) -> Result<Self> {
		Self::with_retry(cfg, RetryPolicy::from_config(&cfg.retry))
	}

	pub fn with_retry(cfg: &liftoff_config::Source, retry: RetryPolicy) -> Result<Self> {
		let api_base = Url::parse(&cfg.api_base).map_err(|err| Error::InvalidConfig {
			message: format!("source.api_base is not a valid URL: {err}."),
		})?;

		if api_base.cannot_be_a_base() {
			return Err(Error::InvalidConfig {
				message: "source.api_base cannot be used as a base URL.".to_string(),
			});
		}

		let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;

		Ok(Self { client, api_base, retry })
	}

	pub async fn video_info(&self, video_id: &str) -> Result<VideoInfo> {
		let url = self.video_url(video_id, &[])?;

		self.retry
			.run("Video info request", || {
				let request = self.client.get(url.clone());

				async move {
					let res = check_status(request.send().await?)?;

					Ok::<_, Error>(res.json::<VideoInfo>().await?)
				}
			})
			.await
	}

	pub async fn frame_image(&self, video_id: &str, frame_index: u64) -> Result<Vec<u8>> {
		let index = frame_index.to_string();
		let url = self.video_url(video_id, &["frame", index.as_str()])?;

		let bytes = self
			.retry
			.run("Frame image request", || {
				let request = self.client.get(url.clone());

				async move {
					let res = check_status(request.send().await?)?;

					Ok::<_, Error>(res.bytes().await?)
				}
			})
			.await?;

		if bytes.is_empty() {
			return Err(Error::InvalidResponse {
				message: format!("Frame {frame_index} of {video_id} came back empty."),
			});
		}

		Ok(bytes.to_vec())
	}

	/// `{api_base}video/{video_id}/{extra..}/` with every segment percent-encoded.
	fn video_url(&self, video_id: &str, extra: &[&str]) -> Result<Url> {
		let mut url = self.api_base.clone();

		url.path_segments_mut()
			.map_err(|_| Error::InvalidConfig {
				message: "source.api_base cannot be used as a base URL.".to_string(),
			})?
			.pop_if_empty()
			.push("video")
			.push(video_id)
			.extend(extra)
			.push("");

		Ok(url)
	}
}

fn check_status(res: reqwest::Response) -> Result<reqwest::Response> {
	let status = res.status();

	if status.is_success() {
		return Ok(res);
	}

	Err(Error::Status { status, url: res.url().to_string() })
}

fn deserialize_frame_rate<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Option::<RawFrameRate>::deserialize(deserializer)?;

	Ok(raw.and_then(RawFrameRate::frames_per_second))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn client(api_base: &str) -> FramexClient {
		let cfg = liftoff_config::Source {
			api_base: api_base.to_string(),
			video_id: "unused".to_string(),
			timeout_ms: 1_000,
			retry: Default::default(),
		};

		FramexClient::new(&cfg).expect("Client must build.")
	}

	#[test]
	fn frame_rate_accepts_ratio_and_number() {
		let ratio: VideoInfo =
			serde_json::from_value(serde_json::json!({ "frames": 61696, "frame_rate": [30, 1] }))
				.expect("parse failed");
		let ntsc: VideoInfo = serde_json::from_value(
			serde_json::json!({ "frames": 10, "frame_rate": [30000, 1001] }),
		)
		.expect("parse failed");
		let number: VideoInfo =
			serde_json::from_value(serde_json::json!({ "frames": 10, "frame_rate": 25.0 }))
				.expect("parse failed");

		assert_eq!(ratio.total_frames, 61_696);
		assert_eq!(ratio.frame_rate, Some(30.0));
		assert!((ntsc.frame_rate.expect("rate") - 29.97).abs() < 0.001);
		assert_eq!(number.frame_rate, Some(25.0));
	}

	#[test]
	fn unusable_frame_rate_is_dropped() {
		for rate in [
			serde_json::json!([30, 0]),
			serde_json::json!([]),
			serde_json::json!(-1.0),
			serde_json::json!(null),
		] {
			let info: VideoInfo =
				serde_json::from_value(serde_json::json!({ "frames": 10, "frame_rate": rate }))
					.expect("parse failed");

			assert_eq!(info.frame_rate, None);
		}

		let missing: VideoInfo =
			serde_json::from_value(serde_json::json!({ "frames": 10 })).expect("parse failed");

		assert_eq!(missing.frame_rate, None);
	}

	#[test]
	fn video_urls_encode_segments() {
		let client = client("https://framex.example.com/api/");
		let url = client
			.video_url("Falcon Heavy (Hosted Webcast)", &["frame", "42"])
			.expect("URL must build.");

		assert_eq!(
			url.as_str(),
			"https://framex.example.com/api/video/Falcon%20Heavy%20(Hosted%20Webcast)/frame/42/"
		);
	}

	#[test]
	fn api_base_without_trailing_slash_keeps_its_path() {
		let client = client("https://framex.example.com/api");
		let url = client.video_url("clip", &[]).expect("URL must build.");

		assert_eq!(url.as_str(), "https://framex.example.com/api/video/clip/");
	}
}
