//! Serialized ingestion task.
//!
//! The service subscribes to all three collaborators and funnels their events
//! through one mailbox drained by a single task, so registry mutations from
//! different sources never interleave. Subscriptions are attached before the
//! initial load starts; events raised during the load queue up and are applied
//! once it finishes.

use std::sync::Arc;

use addrbook_registry::{Listener, SubscriptionId};
use addrbook_view::ViewAdapter;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::IngestConfig;
use crate::ingest::{self, IngestReport, SourceEvent};
use crate::Sources;


/// Mailbox message for the ingest task.
#[derive(Debug)]
enum IngestCmd {
	Event(SourceEvent),
	Flush(oneshot::Sender<()>),
}

type Mailbox = mpsc::UnboundedSender<IngestCmd>;

/// Subscription handles held on the three collaborators.
struct Subscriptions {
	contacts: SubscriptionId,
	history: SubscriptionId,
	calls: SubscriptionId,
}

impl Subscriptions {
	fn attach(sources: &Sources, mailbox: &Mailbox) -> Self {
		Self {
			contacts: sources.contacts.subscribe(forward(mailbox, SourceEvent::Directory)),
			history: sources.history.subscribe(forward(mailbox, SourceEvent::History)),
			calls: sources.calls.subscribe(forward(mailbox, SourceEvent::Call)),
		}
	}

	fn detach(self, sources: &Sources) {
		sources.contacts.unsubscribe(self.contacts);
		sources.history.unsubscribe(self.history);
		sources.calls.unsubscribe(self.calls);
	}
}

/// Builds a listener that posts every event into the mailbox.
fn forward<E>(mailbox: &Mailbox, wrap: fn(E) -> SourceEvent) -> Listener<E>
where
	E: Clone + Send + Sync + 'static,
{
	let mailbox = mailbox.clone();
	Arc::new(move |event: &E| {
		if mailbox.send(IngestCmd::Event(wrap(event.clone()))).is_err() {
			debug!("ingest mailbox closed, dropping source event");
		}
	})
}

/// Entry point for the ingest task.
pub struct IngestService;

impl IngestService {
	/// Starts ingesting `sources` into `view` on the current tokio runtime.
	///
	/// # Panics
	///
	/// Panics if called outside a tokio runtime.
	pub fn spawn(view: Arc<ViewAdapter>, sources: Sources, config: &IngestConfig) -> IngestHandle {
		let (tx, rx) = mpsc::unbounded_channel();
		let subscriptions = Subscriptions::attach(&sources, &tx);
		let cancel = CancellationToken::new();

		let task = tokio::spawn(run(view, sources.clone(), config.initial_load, rx, cancel.clone()));
		debug!(initial_load = config.initial_load, "ingest service started");

		IngestHandle {
			mailbox: tx,
			cancel,
			sources,
			subscriptions: Some(subscriptions),
			task: Some(task),
		}
	}
}

async fn run(
	view: Arc<ViewAdapter>,
	sources: Sources,
	initial_load: bool,
	mut mailbox: mpsc::UnboundedReceiver<IngestCmd>,
	cancel: CancellationToken,
) -> IngestReport {
	let mut report = IngestReport::default();

	if initial_load {
		tokio::select! {
			biased;
			_ = cancel.cancelled() => return report,
			loaded = ingest::initial_load(&view, &sources) => report += loaded,
		}
	}

	loop {
		tokio::select! {
			biased;
			_ = cancel.cancelled() => break,
			cmd = mailbox.recv() => match cmd {
				Some(IngestCmd::Event(event)) => report += ingest::apply_event(&view, &event),
				Some(IngestCmd::Flush(done)) => {
					let _ = done.send(());
				}
				None => break,
			},
		}
	}

	info!(
		inserted = report.inserted,
		changed = report.changed,
		removed = report.removed,
		skipped = report.skipped,
		warned = report.warned,
		"ingest service stopped"
	);
	report
}

/// Control handle for a running ingest service.
///
/// Dropping the handle detaches from the sources and stops the task.
pub struct IngestHandle {
	mailbox: Mailbox,
	cancel: CancellationToken,
	sources: Sources,
	subscriptions: Option<Subscriptions>,
	task: Option<JoinHandle<IngestReport>>,
}

impl IngestHandle {
	/// Queues an event as if a collaborator had raised it.
	///
	/// Returns false if the service has stopped.
	pub fn send(&self, event: SourceEvent) -> bool {
		self.mailbox.send(IngestCmd::Event(event)).is_ok()
	}

	/// Waits until every event queued before this call has been applied,
	/// including the initial load.
	///
	/// Returns false if the service stopped first.
	pub async fn flush(&self) -> bool {
		let (done, wait) = oneshot::channel();
		if self.mailbox.send(IngestCmd::Flush(done)).is_err() {
			return false;
		}
		wait.await.is_ok()
	}

	/// Detaches from the sources, stops the task and returns what it applied.
	///
	/// Events still queued are discarded; call [`flush`](Self::flush) first to
	/// apply them.
	pub async fn shutdown(mut self) -> IngestReport {
		self.stop();
		let Some(task) = self.task.take() else {
			return IngestReport::default();
		};
		match task.await {
			Ok(report) => report,
			Err(err) => {
				warn!(error = %err, "ingest task failed");
				IngestReport::default()
			}
		}
	}

	fn stop(&mut self) {
		if let Some(subscriptions) = self.subscriptions.take() {
			subscriptions.detach(&self.sources);
		}
		self.cancel.cancel();
	}
}

impl Drop for IngestHandle {
	fn drop(&mut self) {
		self.stop();
	}
}

impl std::fmt::Debug for IngestHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("IngestHandle")
			.field("attached", &self.subscriptions.is_some())
			.field("cancelled", &self.cancel.is_cancelled())
			.finish()
	}
}
