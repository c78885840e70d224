use std::{
	sync::{
		Arc,
		atomic::{AtomicU32, Ordering},
	},
	time::Duration,
};

use reqwest::StatusCode;
use tokio::time::Instant;

use liftoff_providers::{Error, RetryPolicy};

fn policy(max_attempts: u32) -> RetryPolicy {
	RetryPolicy {
		max_attempts,
		base_delay: Duration::from_millis(200),
		multiplier: 2.0,
		max_delay: Duration::from_secs(5),
	}
}

fn unavailable() -> Error {
	Error::Status { status: StatusCode::SERVICE_UNAVAILABLE, url: "http://frames/".to_string() }
}

#[tokio::test(start_paused = true)]
async fn backoff_follows_the_policy_on_a_paused_clock() {
	let attempts = Arc::new(AtomicU32::new(0));
	let started = Instant::now();
	let result = policy(3)
		.run("Test request", || {
			let attempts = attempts.clone();

			async move {
				if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
					return Err(unavailable());
				}

				Ok(42)
			}
		})
		.await;

	assert_eq!(result.expect("Third attempt must succeed."), 42);
	assert_eq!(attempts.load(Ordering::SeqCst), 3);
	let waited = started.elapsed();

	assert!(
		waited >= Duration::from_millis(600) && waited < Duration::from_millis(610),
		"Unexpected backoff total: {waited:?}"
	);
}

#[tokio::test(start_paused = true)]
async fn last_error_surfaces_after_exhaustion() {
	let attempts = Arc::new(AtomicU32::new(0));
	let result: liftoff_providers::Result<()> = policy(3)
		.run("Test request", || {
			let attempts = attempts.clone();

			async move {
				attempts.fetch_add(1, Ordering::SeqCst);

				Err(unavailable())
			}
		})
		.await;

	assert!(matches!(result, Err(Error::Status { .. })));
	assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn permanent_errors_return_immediately() {
	let attempts = Arc::new(AtomicU32::new(0));
	let started = Instant::now();
	let result: liftoff_providers::Result<()> = policy(5)
		.run("Test request", || {
			let attempts = attempts.clone();

			async move {
				attempts.fetch_add(1, Ordering::SeqCst);

				Err(Error::InvalidResponse { message: "not json".to_string() })
			}
		})
		.await;

	assert!(matches!(result, Err(Error::InvalidResponse { .. })));
	assert_eq!(attempts.load(Ordering::SeqCst), 1);
	assert!(started.elapsed() < Duration::from_millis(1));
}
