//! In-memory collaborators.
//!
//! Each type keeps its data in memory and publishes changes through a
//! [`Subscribers`] list, exactly as a real collaborator would. Mutators emit
//! synchronously on the calling thread.

use addrbook_registry::{Address, ContactRef, Listener, SubscriptionId, Subscribers, Timestamp};
use async_trait::async_trait;
use parking_lot::RwLock;

use crate::calls::{CallEvent, CallLogSource, CallRecord};
use crate::contacts::{Contact, ContactDirectory, DirectoryEvent};
use crate::history::{HistoryEvent, HistorySource, ThreadHistory};

/// Contact directory held in memory.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
	contacts: RwLock<Vec<Contact>>,
	events: Subscribers<DirectoryEvent>,
}

impl MemoryDirectory {
	/// Creates a directory pre-populated with `contacts`.
	pub fn with_contacts(contacts: impl IntoIterator<Item = Contact>) -> Self {
		Self {
			contacts: RwLock::new(contacts.into_iter().collect()),
			events: Subscribers::new(),
		}
	}

	/// Adds or replaces a contact and publishes [`DirectoryEvent::Added`].
	pub fn add(&self, contact: Contact) {
		{
			let mut contacts = self.contacts.write();
			contacts.retain(|existing| existing.id != contact.id);
			contacts.push(contact.clone());
		}
		self.events.emit(&DirectoryEvent::Added(contact));
	}

	/// Deletes a contact and publishes [`DirectoryEvent::Removed`].
	pub fn remove(&self, id: ContactRef) -> Option<Contact> {
		let removed = {
			let mut contacts = self.contacts.write();
			let index = contacts.iter().position(|contact| contact.id == id)?;
			contacts.remove(index)
		};
		self.events.emit(&DirectoryEvent::Removed(removed.clone()));
		Some(removed)
	}

	/// Returns the number of active listeners.
	pub fn listener_count(&self) -> usize {
		self.events.len()
	}
}

#[async_trait]
impl ContactDirectory for MemoryDirectory {
	async fn contacts(&self) -> Vec<Contact> {
		self.contacts.read().clone()
	}

	fn subscribe(&self, listener: Listener<DirectoryEvent>) -> SubscriptionId {
		self.events.subscribe(listener)
	}

	fn unsubscribe(&self, id: SubscriptionId) -> bool {
		self.events.unsubscribe(id)
	}
}

/// Message history held in memory.
#[derive(Debug, Default)]
pub struct MemoryHistory {
	threads: RwLock<Vec<ThreadHistory>>,
	events: Subscribers<HistoryEvent>,
}

impl MemoryHistory {
	/// Creates a history pre-populated with `threads`.
	pub fn with_threads(threads: impl IntoIterator<Item = ThreadHistory>) -> Self {
		Self {
			threads: RwLock::new(threads.into_iter().collect()),
			events: Subscribers::new(),
		}
	}

	/// Appends a message to the thread with `peer` and publishes
	/// [`HistoryEvent::MessageAdded`].
	pub fn push_message(&self, peer: impl Into<Address>, at: Timestamp) {
		let peer = peer.into();
		{
			let mut threads = self.threads.write();
			match threads.iter_mut().find(|thread| thread.peer == peer) {
				Some(thread) => thread.messages.push(at),
				None => threads.push(ThreadHistory::new(peer.clone(), vec![at])),
			}
		}
		self.events.emit(&HistoryEvent::MessageAdded { peer, at });
	}

	/// Deletes every message with `peer` and publishes
	/// [`HistoryEvent::AllEntriesRemoved`].
	pub fn clear(&self, peer: impl Into<Address>) {
		let peer = peer.into();
		if let Some(thread) = self.threads.write().iter_mut().find(|thread| thread.peer == peer) {
			thread.messages.clear();
		}
		self.events.emit(&HistoryEvent::AllEntriesRemoved { peer });
	}

	/// Returns the number of active listeners.
	pub fn listener_count(&self) -> usize {
		self.events.len()
	}
}

#[async_trait]
impl HistorySource for MemoryHistory {
	async fn threads(&self) -> Vec<ThreadHistory> {
		self.threads.read().clone()
	}

	fn subscribe(&self, listener: Listener<HistoryEvent>) -> SubscriptionId {
		self.events.subscribe(listener)
	}

	fn unsubscribe(&self, id: SubscriptionId) -> bool {
		self.events.unsubscribe(id)
	}
}

/// Call log held in memory.
#[derive(Debug, Default)]
pub struct MemoryCallLog {
	calls: RwLock<Vec<CallRecord>>,
	events: Subscribers<CallEvent>,
}

impl MemoryCallLog {
	/// Creates a call log pre-populated with `calls`.
	pub fn with_calls(calls: impl IntoIterator<Item = CallRecord>) -> Self {
		Self {
			calls: RwLock::new(calls.into_iter().collect()),
			events: Subscribers::new(),
		}
	}

	/// Appends a call and publishes [`CallEvent::Logged`].
	pub fn log(&self, call: CallRecord) {
		self.calls.write().push(call.clone());
		self.events.emit(&CallEvent::Logged(call));
	}

	/// Returns the number of active listeners.
	pub fn listener_count(&self) -> usize {
		self.events.len()
	}
}

#[async_trait]
impl CallLogSource for MemoryCallLog {
	async fn call_log(&self) -> Vec<CallRecord> {
		self.calls.read().clone()
	}

	fn subscribe(&self, listener: Listener<CallEvent>) -> SubscriptionId {
		self.events.subscribe(listener)
	}

	fn unsubscribe(&self, id: SubscriptionId) -> bool {
		self.events.unsubscribe(id)
	}
}
