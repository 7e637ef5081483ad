//! Call log contract.

use addrbook_registry::{Address, Listener, SubscriptionId, Timestamp};
use async_trait::async_trait;
use chrono::Duration;

/// One entry of the call log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
	/// Remote party.
	pub remote: Address,
	/// When the call started.
	pub start: Timestamp,
	/// How long the call lasted.
	pub duration: Duration,
}

impl CallRecord {
	/// Creates a call record.
	pub fn new(remote: impl Into<Address>, start: Timestamp, duration: Duration) -> Self {
		Self {
			remote: remote.into(),
			start,
			duration,
		}
	}

	/// Returns when the call ended, which is the activity time it contributes.
	///
	/// Falls back to the start time if the end is not representable.
	pub fn ended_at(&self) -> Timestamp {
		self.start.checked_add_signed(self.duration).unwrap_or(self.start)
	}
}

/// Change in the call log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallEvent {
	/// A finished call was appended to the log.
	Logged(CallRecord),
}

/// Source of call history.
#[async_trait]
pub trait CallLogSource: Send + Sync {
	/// Returns every call in the log.
	async fn call_log(&self) -> Vec<CallRecord>;

	/// Registers a listener for new calls.
	fn subscribe(&self, listener: Listener<CallEvent>) -> SubscriptionId;

	/// Removes a listener. Returns false if `id` was not subscribed.
	fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
