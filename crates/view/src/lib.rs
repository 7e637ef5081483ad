//! List-style view over the address registry.
//!
//! [`ViewAdapter`] owns a [`Registry`] and is the only way to mutate it once
//! shared. It exposes a row-count + row-at read model and publishes one
//! [`RowChange`] per mutation to its subscribers.
//!
//! # Locking
//!
//! Mutations hold the write lock for the registry operation, then downgrade
//! to a read lock while subscribers are notified. No other mutation can run
//! until every subscriber has returned, yet subscribers can read the
//! post-mutation state through the adapter. Subscribers must not mutate the
//! adapter from inside a notification.

use std::sync::Arc;

use addrbook_registry::{
	ActivityMerge, Address, ContactRef, Listener, Outcome, Record, Registry, RegistryConfig, RowChange, SubscriptionId, Subscribers,
	Timestamp,
};
use parking_lot::{RwLock, RwLockWriteGuard};
use tracing::{trace, warn};


/// Read model and notification surface for a list view.
#[derive(Debug, Default)]
pub struct ViewAdapter {
	registry: RwLock<Registry>,
	subscribers: Subscribers<RowChange>,
}

impl ViewAdapter {
	/// Wraps an existing registry.
	pub fn new(registry: Registry) -> Self {
		Self {
			registry: RwLock::new(registry),
			subscribers: Subscribers::new(),
		}
	}

	/// Creates an adapter over an empty registry configured with `config`.
	pub fn with_config(config: RegistryConfig) -> Self {
		Self::new(Registry::with_config(config))
	}

	/// Registers a listener for structural changes.
	pub fn subscribe(&self, listener: impl Fn(&RowChange) + Send + Sync + 'static) -> SubscriptionId {
		let listener: Listener<RowChange> = Arc::new(listener);
		self.subscribers.subscribe(listener)
	}

	/// Removes a listener. Returns false if `id` was not subscribed.
	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		self.subscribers.unsubscribe(id)
	}

	/// Returns the number of rows.
	pub fn row_count(&self) -> usize {
		self.registry.read_recursive().len()
	}

	/// Returns a copy of the record at `row`.
	pub fn row_at(&self, row: usize) -> Option<Record> {
		self.registry.read_recursive().row(row).cloned()
	}

	/// Returns the contact linked to `address`, if any.
	pub fn lookup_contact(&self, address: &str) -> Option<ContactRef> {
		self.registry.read_recursive().lookup_contact(address)
	}

	/// Returns the row currently holding `address`.
	pub fn position_of(&self, address: &str) -> Option<usize> {
		self.registry.read_recursive().position_of(address)
	}

	/// Copies every record in row order.
	pub fn snapshot(&self) -> Vec<Record> {
		self.registry.read_recursive().snapshot()
	}

	/// Runs `f` against the registry under a read lock.
	pub fn with_registry<R>(&self, f: impl FnOnce(&Registry) -> R) -> R {
		f(&*self.registry.read_recursive())
	}

	/// See [`Registry::record_from_contact`].
	pub fn record_from_contact(&self, address: impl Into<Address>, contact: ContactRef) -> RowChange {
		self.commit(|registry| {
			let change = registry.record_from_contact(address, contact);
			(change, Some(change))
		})
	}

	/// See [`Registry::record_activity`].
	pub fn record_activity(&self, address: impl Into<Address>, at: Timestamp) -> RowChange {
		self.commit(|registry| {
			let change = registry.record_activity(address, at);
			(change, Some(change))
		})
	}

	/// See [`Registry::record_activity_with`].
	pub fn record_activity_with(&self, address: impl Into<Address>, at: Timestamp, merge: ActivityMerge) -> RowChange {
		self.commit(|registry| {
			let change = registry.record_activity_with(address, at, merge);
			(change, Some(change))
		})
	}

	/// See [`Registry::clear_contact`]. Skipped outcomes publish nothing.
	pub fn clear_contact(&self, address: &str) -> Outcome {
		self.commit(|registry| {
			let outcome = registry.clear_contact(address);
			let change = outcome.change();
			(outcome, change)
		})
	}

	/// See [`Registry::clear_activity`]. Skipped outcomes publish nothing.
	pub fn clear_activity(&self, address: &str) -> Outcome {
		self.commit(|registry| {
			let outcome = registry.clear_activity(address);
			let change = outcome.change();
			(outcome, change)
		})
	}

	/// Removes `count` rows starting at `start`.
	///
	/// Returns false, mutating and publishing nothing, when the range does not
	/// fit the current rows.
	pub fn remove_rows(&self, start: usize, count: usize) -> bool {
		self.commit(|registry| match registry.remove_range(start, count) {
			Ok(change) => (true, Some(change)),
			Err(err) => {
				warn!(%err, "row removal rejected");
				(false, None)
			}
		})
	}

	/// Removes the row at `row`.
	pub fn remove_row(&self, row: usize) -> bool {
		self.remove_rows(row, 1)
	}

	/// Applies one registry mutation and publishes its change before any
	/// other mutation can start.
	fn commit<R>(&self, mutate: impl FnOnce(&mut Registry) -> (R, Option<RowChange>)) -> R {
		let mut guard = self.registry.write();
		let (result, change) = mutate(&mut *guard);
		let guard = RwLockWriteGuard::downgrade(guard);
		if let Some(change) = change {
			trace!(?change, rows = guard.len(), "publishing row change");
			self.subscribers.emit(&change);
		}
		drop(guard);
		result
	}
}
