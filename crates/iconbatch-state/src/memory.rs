use std::sync::Mutex;

use crate::error::{StateError, StateResult};
use crate::{Progress, ProgressStore};

/// In-memory progress store (for testing).
///
/// Holds the serialized text rather than a parsed value so loads go through
/// the same parsing and validation as the file store.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    raw: Option<String>,
    backup: Option<String>,
    fail_writes: bool,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose persisted data is `raw`.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        let store = Self::new();
        store.state.lock().unwrap().raw = Some(raw.into());
        store
    }

    /// Make every subsequent write fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }

    pub fn raw(&self) -> Option<String> {
        self.state.lock().unwrap().raw.clone()
    }

    /// Data preserved by the last quarantine.
    pub fn backup(&self) -> Option<String> {
        self.state.lock().unwrap().backup.clone()
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        self.state.lock().unwrap().writes
    }
}

impl ProgressStore for MemoryStore {
    fn read(&self) -> StateResult<Option<Progress>> {
        let state = self.state.lock().unwrap();
        state.raw.as_deref().map(Progress::parse).transpose()
    }

    fn write(&self, progress: &Progress) -> StateResult<()> {
        let json = progress.to_json_pretty()?;
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(StateError::Unavailable("writes disabled".to_string()));
        }
        state.raw = Some(json);
        state.writes += 1;
        Ok(())
    }

    fn quarantine(&self) -> StateResult<Option<std::path::PathBuf>> {
        let mut state = self.state.lock().unwrap();
        state.backup = state.raw.clone();
        Ok(None)
    }
}
