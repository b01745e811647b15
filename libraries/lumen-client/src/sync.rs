//! Document list synchronizer.
//!
//! Holds the documents the user sees and keeps them consistent with the
//! backend:
//!
//! - `refresh` replaces the whole list with a fresh listing
//! - `upload` sends files concurrently, waits for every one to settle, then refreshes
//! - `remove` deletes one document and drops it locally without re-fetching
//!
//! No operation returns an error. Failures are reported through the
//! [`Notifier`] and leave the held list untouched.

use crate::backend::DocumentBackend;
use crate::error::ClientError;
use crate::notify::{Notification, Notifier, TracingNotifier};
use crate::types::{DocumentSummary, UploadFile};
use futures_util::future::join_all;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

/// Outcome of uploading one file.
#[derive(Debug)]
pub struct UploadOutcome {
    pub file_name: String,
    pub result: Result<(), ClientError>,
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcome of a batch upload, in the order the files were given.
#[derive(Debug)]
pub struct UploadReport {
    pub outcomes: Vec<UploadOutcome>,
    /// Whether the follow-up refresh replaced the list.
    pub refreshed: bool,
}

impl UploadReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }
}

#[derive(Debug, Default)]
struct SyncState {
    documents: Vec<DocumentSummary>,
    /// Ticket of the refresh whose listing is currently held.
    applied_ticket: u64,
}

/// Keeps an in-memory document list in step with a [`DocumentBackend`].
///
/// All operations take `&self`; uploads and deletes may run concurrently
/// with each other and with a refresh.
pub struct DocumentSynchronizer<B, N = TracingNotifier> {
    backend: B,
    notifier: N,
    state: RwLock<SyncState>,
    refreshes_in_flight: AtomicUsize,
    next_ticket: AtomicU64,
}

impl<B: DocumentBackend> DocumentSynchronizer<B, TracingNotifier> {
    /// Create a synchronizer that reports through the `tracing` log.
    pub fn new(backend: B) -> Self {
        Self::with_notifier(backend, TracingNotifier)
    }
}

impl<B: DocumentBackend, N: Notifier> DocumentSynchronizer<B, N> {
    /// Create a synchronizer with an explicit notifier.
    pub fn with_notifier(backend: B, notifier: N) -> Self {
        Self {
            backend,
            notifier,
            state: RwLock::new(SyncState::default()),
            refreshes_in_flight: AtomicUsize::new(0),
            next_ticket: AtomicU64::new(0),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Snapshot of the held documents, in backend order.
    pub fn documents(&self) -> Vec<DocumentSummary> {
        self.read_state().documents.clone()
    }

    /// Look up a held document by id.
    pub fn get(&self, id: &str) -> Option<DocumentSummary> {
        self.read_state()
            .documents
            .iter()
            .find(|d| d.id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.read_state().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_state().documents.is_empty()
    }

    /// True while at least one refresh is outstanding.
    pub fn is_loading(&self) -> bool {
        self.refreshes_in_flight.load(Ordering::SeqCst) > 0
    }

    /// Replace the held list with a fresh listing from the backend.
    ///
    /// Returns `true` if the list was replaced. On failure the list is left
    /// as it was and an error notification is emitted. When refreshes
    /// overlap, a response older than the one already applied is dropped.
    pub async fn refresh(&self) -> bool {
        let ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        let _loading = LoadingGuard::enter(&self.refreshes_in_flight);

        debug!(ticket, "Refreshing documents");

        match self.backend.list_documents().await {
            Ok(documents) => {
                // Unique ids win over mirroring the listing length when the
                // backend repeats an id.
                let documents = dedupe_by_id(documents);
                let mut state = self.write_state();

                if ticket < state.applied_ticket {
                    debug!(
                        ticket,
                        applied = state.applied_ticket,
                        "Discarding stale document listing"
                    );
                    return false;
                }

                info!(documents = documents.len(), ticket, "Documents refreshed");
                state.documents = documents;
                state.applied_ticket = ticket;
                true
            }
            Err(e) => {
                warn!(error = %e, ticket, "Error fetching documents");
                self.notifier
                    .notify(Notification::error("Failed to load documents"));
                false
            }
        }
    }

    /// Upload every file concurrently, then refresh once all have settled.
    ///
    /// Each file's outcome is reported on its own; a failure never stops
    /// the others. The refresh runs whatever the mix of outcomes.
    pub async fn upload(&self, files: &[UploadFile]) -> UploadReport {
        debug!(files = files.len(), "Uploading documents");

        let outcomes = join_all(files.iter().map(|file| self.upload_one(file))).await;

        let report_failed = outcomes.iter().filter(|o| !o.is_success()).count();
        info!(
            total = outcomes.len(),
            failed = report_failed,
            "Uploads settled"
        );

        let refreshed = self.refresh().await;

        UploadReport {
            outcomes,
            refreshed,
        }
    }

    async fn upload_one(&self, file: &UploadFile) -> UploadOutcome {
        let result = self.backend.upload_document(file).await;

        match &result {
            Ok(()) => {
                self.notifier.notify(Notification::success(format!(
                    "{} uploaded successfully",
                    file.name
                )));
            }
            Err(e) if e.is_rejection() => {
                let reason = e.user_reason().unwrap_or("unknown error");
                self.notifier.notify(Notification::error(format!(
                    "Failed to upload {}: {}",
                    file.name, reason
                )));
            }
            Err(e) => {
                warn!(error = %e, file = %file.name, "Error uploading document");
                self.notifier
                    .notify(Notification::error(format!("Failed to upload {}", file.name)));
            }
        }

        UploadOutcome {
            file_name: file.name.clone(),
            result,
        }
    }

    /// Delete a document and drop it from the held list.
    ///
    /// Returns `true` if the backend confirmed the delete. Otherwise the
    /// held list is left exactly as it was.
    pub async fn remove(&self, id: &str) -> bool {
        let name = self
            .get(id)
            .map(|d| d.name)
            .unwrap_or_else(|| id.to_string());

        match self.backend.delete_document(id).await {
            Ok(()) => {
                self.write_state().documents.retain(|d| d.id != id);
                debug!(document_id = %id, "Removed document from list");
                self.notifier
                    .notify(Notification::success(format!("Deleted: {}", name)));
                true
            }
            Err(e) => {
                warn!(error = %e, document_id = %id, "Error deleting document");
                self.notifier
                    .notify(Notification::error(format!("Failed to delete: {}", name)));
                false
            }
        }
    }

    /// Announce that a document was opened. No request is made.
    pub fn view(&self, document: &DocumentSummary) {
        self.notifier
            .notify(Notification::info(format!("Viewing: {}", document.name)));
    }

    fn read_state(&self) -> RwLockReadGuard<'_, SyncState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SyncState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keeps the loading counter raised for as long as it lives.
struct LoadingGuard<'a>(&'a AtomicUsize);

impl<'a> LoadingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Drop repeated ids, keeping the first occurrence.
fn dedupe_by_id(documents: Vec<DocumentSummary>) -> Vec<DocumentSummary> {
    let mut seen = HashSet::with_capacity(documents.len());
    let before = documents.len();

    let unique: Vec<_> = documents
        .into_iter()
        .filter(|d| seen.insert(d.id.clone()))
        .collect();

    if unique.len() != before {
        warn!(
            duplicates = before - unique.len(),
            "Backend listing contained duplicate document ids"
        );
    }

    unique
}
