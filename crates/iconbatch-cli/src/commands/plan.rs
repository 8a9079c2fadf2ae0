use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use iconbatch_config::{collection_links, RunConfig};
use iconbatch_state::{JsonFileStore, ProgressStore};

use super::{display_key, display_state};

pub fn cmd_plan(config: &RunConfig, config_dir: &Path, store: &JsonFileStore) -> Result<()> {
    let links = collection_links(config, config_dir).context("Failed to resolve collections")?;
    let progress = store
        .read()
        .with_context(|| format!("Failed to read {}", store.path().display()))?
        .unwrap_or_default();

    println!(
        "\nPlan for {} collection(s), progress in {}",
        links.len(),
        store.path().display()
    );
    println!(
        "Retry: {} attempt(s), {}ms apart\n",
        config.retry.max_attempts, config.retry.delay_ms
    );
    println!("{:<60} {:>10} {:>8}", "Collection", "Resume at", "State");
    println!("{:-<80}", "");

    for link in &links {
        let offset = progress.resume_offset(link);
        let state = match progress.get(link) {
            Some(record) => display_state(record),
            None => "new".cyan(),
        };
        println!("{:<60} {:>10} {:>8}", display_key(link), offset, state);
    }

    println!();
    Ok(())
}
