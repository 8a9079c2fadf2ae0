mod error;
mod file;
pub mod legacy;
mod memory;
mod record;

use std::path::PathBuf;

use tracing::{error, info, warn};

pub use error::{StateError, StateResult};
pub use file::{default_backup_path, JsonFileStore};
pub use memory::MemoryStore;
pub use record::{validate, Progress, ProgressRecord};

/// Trait for progress storage backends.
///
/// Backends implement the three primitives; `load`, `save` and `update`
/// carry the degrade-don't-fail policy on top of them. The whole record set
/// is read and rewritten on every update, so two processes sharing one
/// backend race and the last save wins.
pub trait ProgressStore: Send + Sync {
    /// Read the persisted record set. `Ok(None)` when nothing has been persisted yet.
    fn read(&self) -> StateResult<Option<Progress>>;

    /// Replace the persisted record set.
    fn write(&self, progress: &Progress) -> StateResult<()>;

    /// Preserve a copy of unreadable persisted data before it gets overwritten.
    fn quarantine(&self) -> StateResult<Option<PathBuf>> {
        Ok(None)
    }

    /// Load the record set, degrading to an empty one on any failure.
    fn load(&self) -> Progress {
        match self.read() {
            Ok(Some(progress)) => {
                info!(collections = progress.len(), "Loaded existing progress data");
                for key in progress.integrity_violations() {
                    if let Some(record) = progress.get(key) {
                        warn!(
                            key = %key,
                            processed = record.processed,
                            total = record.total,
                            "Progress record has processed > total"
                        );
                    }
                }
                progress
            }
            Ok(None) => {
                info!("No progress data found, starting fresh");
                Progress::new()
            }
            Err(e) => {
                error!(error = %e, "Failed to load progress data");
                if e.is_corrupt() {
                    match self.quarantine() {
                        Ok(Some(backup)) => {
                            info!(backup = %backup.display(), "Backed up unreadable progress data")
                        }
                        Ok(None) => {}
                        Err(e) => warn!(error = %e, "Failed to back up unreadable progress data"),
                    }
                }
                Progress::new()
            }
        }
    }

    /// Persist the record set. Failures are logged and dropped; the caller's
    /// in-memory copy stays authoritative.
    fn save(&self, progress: &Progress) {
        match self.write(progress) {
            Ok(()) => info!(collections = progress.len(), "Progress saved"),
            Err(e) => error!(error = %e, "Failed to save progress"),
        }
    }

    /// Reload, replace the record for `key` and save.
    fn update(&self, key: &str, total: u64, processed: u64, success: bool) -> ProgressRecord {
        let mut progress = self.load();
        let record = ProgressRecord::stamped(processed, total, success);
        if !record.is_consistent() {
            warn!(key = %key, processed, total, "Recording processed > total");
        }
        progress.insert(key, record.clone());
        self.save(&progress);
        info!(key = %key, processed, total, success, "Progress updated");
        record
    }
}

impl<S: ProgressStore + ?Sized> ProgressStore for std::sync::Arc<S> {
    fn read(&self) -> StateResult<Option<Progress>> {
        (**self).read()
    }

    fn write(&self, progress: &Progress) -> StateResult<()> {
        (**self).write(progress)
    }

    fn quarantine(&self) -> StateResult<Option<PathBuf>> {
        (**self).quarantine()
    }
}
