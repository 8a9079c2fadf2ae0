use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use iconbatch_core::{DelayRange, Pacing, RetryPolicy};
use iconbatch_ui::{ProcessorSettings, Timeouts};

use crate::error::{ConfigError, ConfigResult};
use crate::run_config::{PacingConfig, RangeConfig, RetryConfig, RunConfig, TimeoutsConfig};

/// Validate a run configuration.
pub fn validate_config(config: &RunConfig) -> ConfigResult<()> {
    if config.progress.path.trim().is_empty() {
        return Err(ConfigError::EmptyProgressPath);
    }
    to_retry_policy(&config.retry)?;
    to_pacing(&config.pacing)?;
    to_timeouts(&config.timeouts)?;
    for url in &config.collections {
        check_url(url)?;
    }
    Ok(())
}

/// Convert a validated run config to processor settings.
pub fn to_settings(config: &RunConfig) -> ConfigResult<ProcessorSettings> {
    validate_config(config)?;

    Ok(ProcessorSettings {
        selectors: config.selectors.clone(),
        timeouts: to_timeouts(&config.timeouts)?,
        pacing: to_pacing(&config.pacing)?,
        retry: to_retry_policy(&config.retry)?,
    })
}

pub fn to_retry_policy(retry: &RetryConfig) -> ConfigResult<RetryPolicy> {
    RetryPolicy::try_new(retry.max_attempts, Duration::from_millis(retry.delay_ms))
        .map_err(|_| ConfigError::ZeroAttempts)
}

fn to_pacing(pacing: &PacingConfig) -> ConfigResult<Pacing> {
    Ok(Pacing {
        floor: Duration::from_millis(pacing.floor_ms),
        popup: to_range("popup", pacing.popup)?,
        action: to_range("action", pacing.action)?,
        scroll: to_range("scroll", pacing.scroll)?,
        collection: to_range("collection", pacing.collection)?,
    })
}

fn to_range(name: &str, range: RangeConfig) -> ConfigResult<DelayRange> {
    DelayRange::new(range.min_ms, range.max_ms).map_err(|_| ConfigError::InvalidDelayRange {
        name: name.to_string(),
        min_ms: range.min_ms,
        max_ms: range.max_ms,
    })
}

fn to_timeouts(timeouts: &TimeoutsConfig) -> ConfigResult<Timeouts> {
    let checked = |name: &str, ms: u64| {
        if ms == 0 {
            Err(ConfigError::ZeroTimeout {
                name: name.to_string(),
            })
        } else {
            Ok(Duration::from_millis(ms))
        }
    };

    Ok(Timeouts {
        grid_icon: checked("grid_icon_ms", timeouts.grid_icon_ms)?,
        grid: checked("grid_ms", timeouts.grid_ms)?,
        element: checked("element_ms", timeouts.element_ms)?,
        popup_probe: checked("popup_probe_ms", timeouts.popup_probe_ms)?,
    })
}

fn check_url(url: &str) -> ConfigResult<()> {
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidCollectionUrl {
            url: url.to_string(),
        })
    }
}

/// The ordered work list: inline `collections`, then the entries of
/// `collections_file` (resolved against `base_dir`), duplicates dropped.
pub fn collection_links(config: &RunConfig, base_dir: &Path) -> ConfigResult<Vec<String>> {
    let mut links = config.collections.clone();

    if let Some(file) = &config.collections_file {
        let path = base_dir.join(file);
        let content = fs::read_to_string(&path).map_err(|e| ConfigError::CollectionsFile {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let from_file: Vec<String> =
            serde_json::from_str(&content).map_err(|e| ConfigError::CollectionsFile {
                path: path.clone(),
                message: e.to_string(),
            })?;
        links.extend(from_file);
    }

    let mut seen = HashSet::new();
    links.retain(|url| seen.insert(url.clone()));

    if links.is_empty() {
        return Err(ConfigError::NoCollections);
    }
    for url in &links {
        check_url(url)?;
    }

    Ok(links)
}
