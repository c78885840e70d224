use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One mutex per user. Holding a user's guard serializes every mutation of that user's session;
/// different users never contend.
#[derive(Debug, Default)]
pub(crate) struct UserGates {
	gates: DashMap<String, Arc<Mutex<()>>>,
}
impl UserGates {
	/// Returns `None` while another call holds the user's gate.
	pub(crate) fn try_acquire(&self, user_id: &str) -> Option<OwnedMutexGuard<()>> {
		self.gate(user_id).try_lock_owned().ok()
	}

	pub(crate) async fn acquire(&self, user_id: &str) -> OwnedMutexGuard<()> {
		self.gate(user_id).lock_owned().await
	}

	/// Drops gates nobody holds or waits on.
	pub(crate) fn prune(&self) -> usize {
		let before = self.gates.len();

		self.gates.retain(|_, gate| Arc::strong_count(gate) > 1);

		before.saturating_sub(self.gates.len())
	}

	fn gate(&self, user_id: &str) -> Arc<Mutex<()>> {
		self.gates.entry(user_id.to_string()).or_default().value().clone()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn held_gate_rejects_second_caller() {
		let gates = UserGates::default();
		let guard = gates.try_acquire("alice").expect("First acquire must succeed.");

		assert!(gates.try_acquire("alice").is_none());
		assert!(gates.try_acquire("bob").is_some());

		drop(guard);

		assert!(gates.try_acquire("alice").is_some());
	}

	#[tokio::test]
	async fn prune_keeps_held_gates() {
		let gates = UserGates::default();
		let held = gates.acquire("alice").await;

		drop(gates.acquire("bob").await);

		assert_eq!(gates.prune(), 1);
		assert!(gates.try_acquire("alice").is_none());

		drop(held);

		assert_eq!(gates.prune(), 1);
	}
}
