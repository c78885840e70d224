mod error;

pub use error::{Error, Result};

use std::{
	collections::{HashMap, VecDeque},
	sync::{
		Arc, Mutex,
		atomic::{AtomicUsize, Ordering},
	},
};

use tokio::sync::{Notify, Semaphore};

use liftoff_config::{Config, Retry, Service, Session, Source};
use liftoff_providers::VideoInfo;
use liftoff_service::{BoxFuture, FrameSource};

pub const DEFAULT_VIDEO_ID: &str = "falcon-heavy";

/// Baseline config for tests: no real network endpoint, a 30 minute idle TTL and a 2 second call
/// timeout.
pub fn test_config() -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		source: Source {
			api_base: "http://127.0.0.1:9/api/".to_string(),
			video_id: DEFAULT_VIDEO_ID.to_string(),
			timeout_ms: 1_000,
			retry: Retry::default(),
		},
		session: Session {
			idle_ttl_seconds: 1_800,
			sweep_interval_seconds: 1,
			call_timeout_ms: 2_000,
			max_steps: None,
		},
	}
}

/// The bytes [`FakeFrameSource`] serves for a frame.
pub fn fake_image(video_id: &str, frame_index: u64) -> Vec<u8> {
	format!("{video_id}#{frame_index}").into_bytes()
}

/// What the next scripted call does instead of answering.
#[derive(Clone, Debug)]
pub enum Fault {
	Fail(String),
	/// Never completes. Only a caller-side timeout gets past it.
	Hang,
}

/// In-memory frame source with call accounting and scriptable faults.
#[derive(Default)]
pub struct FakeFrameSource {
	videos: HashMap<String, VideoInfo>,
	info_calls: AtomicUsize,
	image_calls: AtomicUsize,
	fetched: Mutex<Vec<(String, u64)>>,
	info_faults: Mutex<VecDeque<Fault>>,
	image_faults: Mutex<VecDeque<Fault>>,
	holds: Mutex<HashMap<String, Arc<Semaphore>>>,
	held: Notify,
}
impl FakeFrameSource {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_video(mut self, video_id: &str, total_frames: u64, frame_rate: Option<f64>) -> Self {
		self.videos.insert(
			video_id.to_string(),
			VideoInfo {
				name: Some(video_id.to_string()),
				total_frames,
				frame_rate,
				width: Some(1280),
				height: Some(720),
				url: None,
				first_frame: None,
				last_frame: None,
			},
		);

		self
	}

	pub fn fail_next_info(&self, fault: Fault) {
		lock(&self.info_faults).push_back(fault);
	}

	pub fn fail_next_image(&self, fault: Fault) {
		lock(&self.image_faults).push_back(fault);
	}

	/// Parks every image fetch for `video_id` until [`Self::release_images`] is called.
	pub fn hold_images(&self, video_id: &str) {
		lock(&self.holds).insert(video_id.to_string(), Arc::new(Semaphore::new(0)));
	}

	pub fn release_images(&self, video_id: &str) {
		if let Some(hold) = lock(&self.holds).remove(video_id) {
			hold.close();
		}
	}

	/// Resolves once some image fetch is parked by [`Self::hold_images`].
	pub async fn wait_for_held_image(&self) {
		self.held.notified().await;
	}

	pub fn info_calls(&self) -> usize {
		self.info_calls.load(Ordering::SeqCst)
	}

	pub fn image_calls(&self) -> usize {
		self.image_calls.load(Ordering::SeqCst)
	}

	/// Frames served so far, in call order. Failed calls are not included.
	pub fn fetched_frames(&self, video_id: &str) -> Vec<u64> {
		lock(&self.fetched)
			.iter()
			.filter(|(video, _)| video == video_id)
			.map(|(_, frame)| *frame)
			.collect()
	}

	async fn serve_info(&self, video_id: &str) -> Result<VideoInfo> {
		self.info_calls.fetch_add(1, Ordering::SeqCst);

		let fault = lock(&self.info_faults).pop_front();

		apply_fault(fault).await?;

		self.videos.get(video_id).cloned().ok_or_else(|| Error::UnknownVideo(video_id.to_string()))
	}

	async fn serve_image(&self, video_id: &str, frame_index: u64) -> Result<Vec<u8>> {
		self.image_calls.fetch_add(1, Ordering::SeqCst);

		let hold = lock(&self.holds).get(video_id).cloned();

		if let Some(hold) = hold {
			self.held.notify_one();

			// Closing the semaphore is the release signal.
			let _ = hold.acquire().await;
		}

		let fault = lock(&self.image_faults).pop_front();

		apply_fault(fault).await?;

		let info =
			self.videos.get(video_id).ok_or_else(|| Error::UnknownVideo(video_id.to_string()))?;

		if frame_index >= info.total_frames {
			return Err(Error::FrameOutOfRange { video_id: video_id.to_string(), frame_index });
		}

		lock(&self.fetched).push((video_id.to_string(), frame_index));

		Ok(fake_image(video_id, frame_index))
	}
}
impl FrameSource for FakeFrameSource {
	fn video_info<'a>(&'a self, video_id: &'a str) -> BoxFuture<'a, color_eyre::Result<VideoInfo>> {
		Box::pin(async move { Ok(self.serve_info(video_id).await?) })
	}

	fn frame_image<'a>(
		&'a self,
		video_id: &'a str,
		frame_index: u64,
	) -> BoxFuture<'a, color_eyre::Result<Vec<u8>>> {
		Box::pin(async move { Ok(self.serve_image(video_id, frame_index).await?) })
	}
}

async fn apply_fault(fault: Option<Fault>) -> Result<()> {
	match fault {
		None => Ok(()),
		Some(Fault::Fail(message)) => Err(Error::Message(message)),
		Some(Fault::Hang) => std::future::pending().await,
	}
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(|err| err.into_inner())
}
