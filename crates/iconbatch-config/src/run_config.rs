use std::path::PathBuf;

use serde::Deserialize;

use iconbatch_ui::Selectors;

use crate::error::ConfigResult;

/// Raw run configuration as parsed from `iconbatch.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunConfig {
    /// Collection URLs to process, in order.
    #[serde(default)]
    pub collections: Vec<String>,
    /// JSON file holding an array of collection URLs, appended after `collections`.
    #[serde(default)]
    pub collections_file: Option<PathBuf>,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub timeouts: TimeoutsConfig,
    #[serde(default)]
    pub selectors: Selectors,
}

impl RunConfig {
    /// Parse a run config from a TOML string.
    pub fn parse(toml_str: &str) -> ConfigResult<Self> {
        let config: RunConfig = toml::from_str(toml_str)?;
        Ok(config)
    }
}

/// Where progress is persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressConfig {
    /// Progress file; `${VAR}` references are expanded.
    #[serde(default = "default_progress_path")]
    pub path: String,
    /// Copy of an unreadable progress file. Defaults to `<stem>_backup.json`.
    #[serde(default)]
    pub backup_path: Option<String>,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            path: default_progress_path(),
            backup_path: None,
        }
    }
}

fn default_progress_path() -> String {
    "progress.json".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_retry_delay_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

/// An inclusive delay range in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RangeConfig {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl RangeConfig {
    const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub floor_ms: u64,
    pub popup: RangeConfig,
    pub action: RangeConfig,
    pub scroll: RangeConfig,
    pub collection: RangeConfig,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            floor_ms: 50,
            popup: RangeConfig::new(280, 320),
            action: RangeConfig::new(200, 300),
            scroll: RangeConfig::new(400, 600),
            collection: RangeConfig::new(500, 700),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutsConfig {
    pub grid_icon_ms: u64,
    pub grid_ms: u64,
    pub element_ms: u64,
    pub popup_probe_ms: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            grid_icon_ms: 10_000,
            grid_ms: 15_000,
            element_ms: 5_000,
            popup_probe_ms: 2_000,
        }
    }
}
