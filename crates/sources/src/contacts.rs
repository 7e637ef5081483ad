//! Contact directory contract.

use addrbook_registry::{Address, ContactRef, Listener, SubscriptionId};
use async_trait::async_trait;
use smallvec::SmallVec;

/// Directory entry reporting one or more addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
	/// Handle the registry links to.
	pub id: ContactRef,
	/// Display name.
	pub name: String,
	/// Addresses this contact reports.
	pub addresses: SmallVec<[Address; 2]>,
}

impl Contact {
	/// Creates a contact without addresses.
	pub fn new(id: ContactRef, name: impl Into<String>) -> Self {
		Self {
			id,
			name: name.into(),
			addresses: SmallVec::new(),
		}
	}

	/// Adds an address.
	pub fn with_address(mut self, address: impl Into<Address>) -> Self {
		self.addresses.push(address.into());
		self
	}
}

/// Change in the set of known contacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryEvent {
	/// A contact was added or its addresses changed.
	Added(Contact),
	/// A contact was deleted. Carries the addresses it last reported.
	Removed(Contact),
}

/// Source of contacts and contact changes.
#[async_trait]
pub trait ContactDirectory: Send + Sync {
	/// Returns every currently known contact.
	async fn contacts(&self) -> Vec<Contact>;

	/// Registers a listener for directory changes.
	fn subscribe(&self, listener: Listener<DirectoryEvent>) -> SubscriptionId;

	/// Removes a listener. Returns false if `id` was not subscribed.
	fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
