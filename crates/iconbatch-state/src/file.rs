use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{StateError, StateResult};
use crate::{Progress, ProgressStore};

/// JSON-file-backed progress store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    backup_path: PathBuf,
}

impl JsonFileStore {
    /// Use `path` for progress and `<stem>_backup.<ext>` next to it for backups.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let backup_path = default_backup_path(&path);
        Self::with_backup(path, backup_path)
    }

    pub fn with_backup(path: impl Into<PathBuf>, backup_path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let backup_path = backup_path.into();
        info!(path = %path.display(), "Using progress file");
        Self { path, backup_path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    /// Read the raw file contents, `None` if the file does not exist.
    pub fn read_raw(&self) -> StateResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StateError::io(&self.path, e)),
        }
    }

    /// Delete the progress file. Returns false if there was nothing to delete.
    pub fn remove(&self) -> StateResult<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StateError::io(&self.path, e)),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "progress.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ProgressStore for JsonFileStore {
    fn read(&self) -> StateResult<Option<Progress>> {
        match self.read_raw()? {
            Some(text) => Progress::parse(&text).map(Some),
            None => Ok(None),
        }
    }

    fn write(&self, progress: &Progress) -> StateResult<()> {
        let json = progress.to_json_pretty()?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StateError::io(parent, e))?;
        }

        // Write beside the target and rename so readers never see a partial file.
        let tmp = self.temp_path();
        fs::write(&tmp, json).map_err(|e| StateError::io(&tmp, e))?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(StateError::io(&self.path, e));
        }

        debug!(path = %self.path.display(), "Wrote progress file");
        Ok(())
    }

    fn quarantine(&self) -> StateResult<Option<PathBuf>> {
        if !self.path.exists() {
            return Ok(None);
        }
        fs::copy(&self.path, &self.backup_path)
            .map_err(|e| StateError::io(&self.backup_path, e))?;
        Ok(Some(self.backup_path.clone()))
    }
}

/// `dir/progress.json` -> `dir/progress_backup.json`.
pub fn default_backup_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "progress".to_string());
    let name = match path.extension() {
        Some(ext) => format!("{stem}_backup.{}", ext.to_string_lossy()),
        None => format!("{stem}_backup"),
    };
    path.with_file_name(name)
}
