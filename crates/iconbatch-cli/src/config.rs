use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use iconbatch_config::{expand_env, validate_config, RunConfig};
use iconbatch_state::JsonFileStore;

use crate::env;

/// Load iconbatch.toml, falling back to defaults when it does not exist,
/// then apply environment overrides and validate.
pub fn load_config(path: &Path) -> Result<RunConfig> {
    let mut config = if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        RunConfig::parse(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?
    } else {
        info!(path = %path.display(), "No config file, using defaults");
        RunConfig::default()
    };

    env::apply_overrides(&mut config);
    validate_config(&config).with_context(|| format!("Invalid config: {}", path.display()))?;

    Ok(config)
}

/// Directory relative paths in the config file are resolved against.
pub fn config_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Open the progress store named by `--progress` or the config.
pub fn open_store(config: &RunConfig, progress_override: Option<&Path>) -> JsonFileStore {
    let path = match progress_override {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(expand_env(&config.progress.path)),
    };

    match &config.progress.backup_path {
        Some(backup) => JsonFileStore::with_backup(path, expand_env(backup)),
        None => JsonFileStore::open(path),
    }
}
