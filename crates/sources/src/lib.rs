//! Source ingestion for the address registry.
//!
//! Three collaborators feed the registry: the [`ContactDirectory`], the
//! message [`HistorySource`] and the [`CallLogSource`]. They are injected as
//! trait objects through [`Sources`]; nothing here reaches for process-wide
//! state.
//!
//! - [`ingest`]: one-shot and incremental adapters from source data to
//!   registry operations
//! - [`service`]: a task that serializes all source traffic into one view
//! - [`memory`]: in-memory collaborators for embedding and tests

use std::sync::Arc;

pub mod calls;
pub mod config;
pub mod contacts;
pub mod history;
pub mod ingest;
pub mod memory;
pub mod service;

pub use calls::{CallEvent, CallLogSource, CallRecord};
pub use config::IngestConfig;
pub use contacts::{Contact, ContactDirectory, DirectoryEvent};
pub use history::{HistoryEvent, HistorySource, ThreadHistory};
pub use ingest::{IngestReport, SourceEvent};
pub use service::{IngestHandle, IngestService};

/// The three collaborators feeding one registry.
#[derive(Clone)]
pub struct Sources {
	/// Contact directory.
	pub contacts: Arc<dyn ContactDirectory>,
	/// Message thread history.
	pub history: Arc<dyn HistorySource>,
	/// Call log.
	pub calls: Arc<dyn CallLogSource>,
}

impl Sources {
	/// Bundles the three collaborators.
	pub fn new(contacts: Arc<dyn ContactDirectory>, history: Arc<dyn HistorySource>, calls: Arc<dyn CallLogSource>) -> Self {
		Self { contacts, history, calls }
	}
}

impl std::fmt::Debug for Sources {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Sources").finish_non_exhaustive()
	}
}
