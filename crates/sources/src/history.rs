//! Message history contract.

use addrbook_registry::{Address, Listener, SubscriptionId, Timestamp};
use async_trait::async_trait;

/// Message history of one conversation thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadHistory {
	/// Remote party of the thread.
	pub peer: Address,
	/// Message times, oldest first. May be empty.
	pub messages: Vec<Timestamp>,
}

impl ThreadHistory {
	/// Creates a thread history.
	pub fn new(peer: impl Into<Address>, messages: Vec<Timestamp>) -> Self {
		Self {
			peer: peer.into(),
			messages,
		}
	}

	/// Returns the time of the newest message.
	pub fn last_message(&self) -> Option<Timestamp> {
		self.messages.last().copied()
	}
}

/// Change in message history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEvent {
	/// A message was sent or received in the thread with `peer`.
	MessageAdded { peer: Address, at: Timestamp },
	/// Every message of the thread with `peer` was deleted.
	AllEntriesRemoved { peer: Address },
}

/// Source of message history.
#[async_trait]
pub trait HistorySource: Send + Sync {
	/// Returns every conversation thread.
	async fn threads(&self) -> Vec<ThreadHistory>;

	/// Registers a listener for history changes.
	fn subscribe(&self, listener: Listener<HistoryEvent>) -> SubscriptionId;

	/// Removes a listener. Returns false if `id` was not subscribed.
	fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
