//! In-process publish/subscribe list.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

/// Callback invoked for every emitted event.
pub type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Handle returned by [`Subscribers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered list of listeners for one event type.
///
/// Listeners run in subscription order on the emitting thread. The list is
/// snapshotted before delivery, so a listener may subscribe or unsubscribe
/// while it is being called; such changes apply from the next emission.
pub struct Subscribers<E> {
	next_id: AtomicU64,
	listeners: RwLock<Vec<(SubscriptionId, Listener<E>)>>,
}

impl<E> Default for Subscribers<E> {
	fn default() -> Self {
		Self {
			next_id: AtomicU64::new(0),
			listeners: RwLock::new(Vec::new()),
		}
	}
}

impl<E> Subscribers<E> {
	/// Creates an empty list.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a listener.
	pub fn subscribe(&self, listener: Listener<E>) -> SubscriptionId {
		let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
		self.listeners.write().push((id, listener));
		id
	}

	/// Removes a listener. Returns false if `id` was not subscribed.
	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		let mut listeners = self.listeners.write();
		let before = listeners.len();
		listeners.retain(|(existing, _)| *existing != id);
		listeners.len() != before
	}

	/// Delivers `event` to every listener.
	pub fn emit(&self, event: &E) {
		let snapshot: Vec<Listener<E>> = self.listeners.read().iter().map(|(_, listener)| Arc::clone(listener)).collect();
		for listener in snapshot {
			listener(event);
		}
	}

	/// Returns the number of listeners.
	pub fn len(&self) -> usize {
		self.listeners.read().len()
	}

	/// Returns true if nobody is listening.
	pub fn is_empty(&self) -> bool {
		self.listeners.read().is_empty()
	}
}

impl<E> std::fmt::Debug for Subscribers<E> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Subscribers").field("len", &self.len()).finish()
	}
}
