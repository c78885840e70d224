use std::{sync::Arc, time::Duration};

use time::{OffsetDateTime, macros::datetime};

use liftoff_domain::session::SearchSession;
use liftoff_storage::{Error, MemoryStore, SessionStore};

const T0: OffsetDateTime = datetime!(2026-10-18 12:00 UTC);

fn session(user_id: &str, total_frames: u64, now: OffsetDateTime) -> SearchSession {
	SearchSession::start(user_id, "falcon-heavy", total_frames, Some(30.0), None, now)
		.expect("Session must start.")
}

#[tokio::test]
async fn put_replaces_the_previous_session() {
	let store = MemoryStore::new();

	store.put(session("alice", 8, T0)).await.expect("Put must succeed.");

	let advanced = session("alice", 8, T0).advance(false, T0).expect("Answer must apply.").session;

	store.put(advanced.clone()).await.expect("Put must succeed.");

	let replacement = session("alice", 100, T0);

	store.put(replacement.clone()).await.expect("Put must succeed.");

	let stored = store.get("alice").await.expect("Get must succeed.");

	assert_eq!(stored, Some(replacement));
	assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn missing_user_reads_as_none() {
	let store = MemoryStore::new();

	assert_eq!(store.get("nobody").await.expect("Get must succeed."), None);
	assert_eq!(store.touch("nobody", T0).await.expect("Touch must succeed."), None);
}

#[tokio::test]
async fn empty_user_id_is_rejected() {
	let store = MemoryStore::new();
	let err = store.put(session(" ", 8, T0)).await.expect_err("Blank user id must be rejected.");

	assert!(matches!(err, Error::InvalidArgument(_)), "Unexpected error: {err:?}");
	assert!(store.is_empty());
}

#[tokio::test]
async fn remove_is_idempotent() {
	let store = MemoryStore::new();

	store.put(session("alice", 8, T0)).await.expect("Put must succeed.");

	assert!(store.remove("alice").await.expect("Remove must succeed."));
	assert!(!store.remove("alice").await.expect("Remove must succeed."));
	assert!(store.is_empty());
}

#[tokio::test]
async fn touch_refreshes_activity() {
	let store = MemoryStore::new();
	let later = T0 + Duration::from_secs(45);

	store.put(session("alice", 8, T0)).await.expect("Put must succeed.");

	let touched = store.touch("alice", later).await.expect("Touch must succeed.");

	assert_eq!(touched.map(|session| session.last_activity_at), Some(later));
	assert_eq!(
		store.get("alice").await.expect("Get must succeed.").map(|s| s.last_activity_at),
		Some(later)
	);
}

#[tokio::test]
async fn sweep_removes_only_idle_sessions() {
	let store = MemoryStore::new();
	let ttl = Duration::from_secs(600);

	store.put(session("stale-1", 8, T0)).await.expect("Put must succeed.");
	store.put(session("stale-2", 8, T0)).await.expect("Put must succeed.");
	store
		.put(session("fresh", 8, T0 + Duration::from_secs(300)))
		.await
		.expect("Put must succeed.");

	let removed = store
		.sweep_expired(T0 + Duration::from_secs(601), ttl)
		.await
		.expect("Sweep must succeed.");

	assert_eq!(removed, 2);
	assert!(store.get("stale-1").await.expect("Get must succeed.").is_none());
	assert!(store.get("fresh").await.expect("Get must succeed.").is_some());

	let removed = store
		.sweep_expired(T0 + Duration::from_secs(601), ttl)
		.await
		.expect("Sweep must succeed.");

	assert_eq!(removed, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn distinct_users_write_concurrently() {
	let store = Arc::new(MemoryStore::new());
	let mut handles = Vec::new();

	for idx in 0..64_u64 {
		let store = store.clone();

		handles.push(tokio::spawn(async move {
			let user_id = format!("user-{idx}");
			let mut current = session(&user_id, idx + 1, T0);

			store.put(current.clone()).await.expect("Put must succeed.");

			while let Some(probe) = current.current_probe {
				let launched = probe >= idx / 2;

				current = current.advance(launched, T0).expect("Answer must apply.").session;

				store.put(current.clone()).await.expect("Put must succeed.");
			}

			current
		}));
	}

	for handle in handles {
		let finished = handle.await.expect("Task must not panic.");
		let stored = store.get(&finished.user_id).await.expect("Get must succeed.");

		assert_eq!(stored.as_ref(), Some(&finished));
	}

	assert_eq!(store.len(), 64);
}
