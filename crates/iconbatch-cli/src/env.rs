use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::{info, warn};

use iconbatch_config::RunConfig;

const MAX_ATTEMPTS_VAR: &str = "ICONBATCH_MAX_ATTEMPTS";
const RETRY_DELAY_VAR: &str = "ICONBATCH_RETRY_DELAY_MS";
const PROGRESS_FILE_VAR: &str = "ICONBATCH_PROGRESS_FILE";

/// Load the nearest .env file, searching from the current directory up to
/// the filesystem root. Having none is fine.
pub fn load_dotenv_from_ancestors() -> Result<Option<PathBuf>> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;

    for dir in cwd.ancestors() {
        let env_path = dir.join(".env");
        if env_path.exists() {
            dotenvy::from_path(&env_path)
                .with_context(|| format!("Failed to load .env from {}", env_path.display()))?;
            info!("Loaded .env from {}", env_path.display());
            return Ok(Some(env_path));
        }
    }

    Ok(None)
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    let value = std::env::var(name).ok()?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(var = name, value = %value, "Ignoring unparseable environment variable");
            None
        }
    }
}

pub fn get_max_attempts() -> Option<u32> {
    parse_var(MAX_ATTEMPTS_VAR)
}

pub fn get_retry_delay_ms() -> Option<u64> {
    parse_var(RETRY_DELAY_VAR)
}

pub fn get_progress_file() -> Option<String> {
    std::env::var(PROGRESS_FILE_VAR)
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Apply `ICONBATCH_*` environment overrides on top of the file config.
pub fn apply_overrides(config: &mut RunConfig) {
    if let Some(attempts) = get_max_attempts() {
        config.retry.max_attempts = attempts;
    }
    if let Some(delay_ms) = get_retry_delay_ms() {
        config.retry.delay_ms = delay_ms;
    }
    if let Some(path) = get_progress_file() {
        config.progress.path = path;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn clear_vars() {
        std::env::remove_var(MAX_ATTEMPTS_VAR);
        std::env::remove_var(RETRY_DELAY_VAR);
        std::env::remove_var(PROGRESS_FILE_VAR);
    }

    #[test]
    #[serial]
    fn test_overrides_apply() {
        clear_vars();
        std::env::set_var(MAX_ATTEMPTS_VAR, "5");
        std::env::set_var(RETRY_DELAY_VAR, " 250 ");
        std::env::set_var(PROGRESS_FILE_VAR, "/tmp/other.json");

        let mut config = RunConfig::default();
        apply_overrides(&mut config);

        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.delay_ms, 250);
        assert_eq!(config.progress.path, "/tmp/other.json");
        clear_vars();
    }

    #[test]
    #[serial]
    fn test_invalid_override_is_ignored() {
        clear_vars();
        std::env::set_var(MAX_ATTEMPTS_VAR, "lots");

        let mut config = RunConfig::default();
        apply_overrides(&mut config);

        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.progress.path, "progress.json");
        clear_vars();
    }

    #[test]
    #[serial]
    fn test_load_dotenv_from_parent_directory() {
        let parent_dir = TempDir::new().unwrap();
        let child_dir = parent_dir.path().join("subdir");
        fs::create_dir(&child_dir).unwrap();
        fs::write(parent_dir.path().join(".env"), "ICONBATCH_TEST_PARENT=world").unwrap();

        let original_dir = std::env::current_dir().unwrap();
        std::env::set_current_dir(&child_dir).unwrap();
        std::env::remove_var("ICONBATCH_TEST_PARENT");

        let loaded = load_dotenv_from_ancestors().unwrap();
        assert!(loaded.is_some());
        assert_eq!(std::env::var("ICONBATCH_TEST_PARENT").unwrap(), "world");

        std::env::set_current_dir(original_dir).unwrap();
        std::env::remove_var("ICONBATCH_TEST_PARENT");
    }
}
