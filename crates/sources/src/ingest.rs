//! Translation of source data and events into registry operations.
//!
//! Every function here goes through the [`ViewAdapter`], so each registry
//! operation is published to view subscribers as it happens.

use std::ops::AddAssign;

use addrbook_registry::{ActivityMerge, Address, Outcome, RowChange, Timestamp};
use addrbook_view::ViewAdapter;
use indexmap::IndexMap;
use tracing::{debug, info, trace};

use crate::calls::{CallEvent, CallRecord};
use crate::contacts::{Contact, DirectoryEvent};
use crate::history::{HistoryEvent, ThreadHistory};
use crate::Sources;


/// Event from any of the three collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEvent {
	/// Contact directory change.
	Directory(DirectoryEvent),
	/// Message history change.
	History(HistoryEvent),
	/// Call log change.
	Call(CallEvent),
}

/// Counts of registry effects produced by ingestion.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
	/// New rows.
	pub inserted: usize,
	/// Rows updated in place.
	pub changed: usize,
	/// Rows removed.
	pub removed: usize,
	/// Stale events that mutated nothing.
	pub skipped: usize,
	/// Changes that cleared a field which was already empty.
	pub warned: usize,
}

impl IngestReport {
	fn note(&mut self, change: RowChange) {
		match change {
			RowChange::Inserted { .. } => self.inserted += 1,
			RowChange::Changed { .. } => self.changed += 1,
			RowChange::Removed { count, .. } => self.removed += count,
		}
	}

	fn note_outcome(&mut self, outcome: &Outcome) {
		if outcome.warning().is_some() {
			self.warned += 1;
		}
		match outcome.change() {
			Some(change) => self.note(change),
			None => self.skipped += 1,
		}
	}

	/// Returns the total number of registry operations counted.
	pub fn total(&self) -> usize {
		self.inserted + self.changed + self.removed + self.skipped
	}
}

impl AddAssign for IngestReport {
	fn add_assign(&mut self, rhs: Self) {
		self.inserted += rhs.inserted;
		self.changed += rhs.changed;
		self.removed += rhs.removed;
		self.skipped += rhs.skipped;
		self.warned += rhs.warned;
	}
}

/// Records the last message time of every non-empty thread.
pub fn ingest_history(view: &ViewAdapter, threads: &[ThreadHistory]) -> IngestReport {
	let mut report = IngestReport::default();
	for thread in threads {
		let Some(at) = thread.last_message() else {
			trace!(peer = %thread.peer, "skipping empty thread");
			continue;
		};
		report.note(view.record_activity(thread.peer.clone(), at));
	}
	report
}

/// Reduces a call log to the latest end time per remote address.
///
/// Addresses keep the order in which they first appear in `calls`.
pub fn latest_call_activity(calls: &[CallRecord]) -> IndexMap<Address, Timestamp> {
	let mut latest: IndexMap<Address, Timestamp> = IndexMap::with_capacity(calls.len());
	for call in calls {
		let ended = call.ended_at();
		latest
			.entry(call.remote.clone())
			.and_modify(|at| *at = (*at).max(ended))
			.or_insert(ended);
	}
	latest
}

/// Records call activity, one registry call per remote address.
///
/// Calls never move an address's activity backwards, so a call older than
/// the address's newest message leaves it untouched.
pub fn ingest_call_log(view: &ViewAdapter, calls: &[CallRecord]) -> IngestReport {
	let mut report = IngestReport::default();
	for (remote, at) in latest_call_activity(calls) {
		report.note(view.record_activity_with(remote, at, ActivityMerge::KeepLatest));
	}
	report
}

/// Links every address of every contact.
pub fn ingest_contacts(view: &ViewAdapter, contacts: &[Contact]) -> IngestReport {
	let mut report = IngestReport::default();
	for contact in contacts {
		report += contact_added(view, contact);
	}
	report
}

/// Links every address of a new or updated contact.
pub fn contact_added(view: &ViewAdapter, contact: &Contact) -> IngestReport {
	let mut report = IngestReport::default();
	for address in &contact.addresses {
		report.note(view.record_from_contact(address.clone(), contact.id));
	}
	report
}

/// Unlinks every address of a deleted contact.
pub fn contact_removed(view: &ViewAdapter, contact: &Contact) -> IngestReport {
	let mut report = IngestReport::default();
	for address in &contact.addresses {
		report.note_outcome(&view.clear_contact(address.as_str()));
	}
	report
}

/// Records a new message with `peer`.
pub fn message_added(view: &ViewAdapter, peer: &Address, at: Timestamp) -> IngestReport {
	let mut report = IngestReport::default();
	report.note(view.record_activity(peer.clone(), at));
	report
}

/// Forgets the activity of `peer` after its whole history was deleted.
pub fn history_cleared(view: &ViewAdapter, peer: &Address) -> IngestReport {
	let mut report = IngestReport::default();
	report.note_outcome(&view.clear_activity(peer.as_str()));
	report
}

/// Records a newly logged call.
pub fn call_logged(view: &ViewAdapter, call: &CallRecord) -> IngestReport {
	let mut report = IngestReport::default();
	report.note(view.record_activity(call.remote.clone(), call.ended_at()));
	report
}

/// Routes one collaborator event to its ingestor.
pub fn apply_event(view: &ViewAdapter, event: &SourceEvent) -> IngestReport {
	trace!(?event, "applying source event");
	match event {
		SourceEvent::Directory(DirectoryEvent::Added(contact)) => contact_added(view, contact),
		SourceEvent::Directory(DirectoryEvent::Removed(contact)) => contact_removed(view, contact),
		SourceEvent::History(HistoryEvent::MessageAdded { peer, at }) => message_added(view, peer, *at),
		SourceEvent::History(HistoryEvent::AllEntriesRemoved { peer }) => history_cleared(view, peer),
		SourceEvent::Call(CallEvent::Logged(call)) => call_logged(view, call),
	}
}

/// Loads all three sources into `view`.
///
/// History goes first, then the call log, then contacts. Contacts are linked
/// last so that every address they report already carries its final
/// activity time.
pub async fn initial_load(view: &ViewAdapter, sources: &Sources) -> IngestReport {
	let mut report = IngestReport::default();

	let threads = sources.history.threads().await;
	let history = ingest_history(view, &threads);
	debug!(threads = threads.len(), ?history, "history loaded");
	report += history;

	let calls = sources.calls.call_log().await;
	let call_log = ingest_call_log(view, &calls);
	debug!(calls = calls.len(), ?call_log, "call log loaded");
	report += call_log;

	let contacts = sources.contacts.contacts().await;
	let linked = ingest_contacts(view, &contacts);
	debug!(contacts = contacts.len(), ?linked, "contacts loaded");
	report += linked;

	info!(rows = view.row_count(), inserted = report.inserted, changed = report.changed, "initial load complete");
	report
}
