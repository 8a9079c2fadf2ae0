use anyhow::{Context, Result};
use iconbatch_state::{JsonFileStore, ProgressStore};

use super::{display_key, display_state, display_time};

pub fn cmd_status(store: &JsonFileStore) -> Result<()> {
    let progress = store
        .read()
        .with_context(|| format!("Failed to read {}", store.path().display()))?
        .unwrap_or_default();

    if progress.is_empty() {
        println!("No progress recorded in {}.", store.path().display());
        return Ok(());
    }

    println!("\nProgress ({}):", store.path().display());
    println!(
        "{:<60} {:>10} {:>8} {:>8}  {}",
        "Collection", "Processed", "Total", "State", "Last attempt"
    );
    println!("{:-<110}", "");

    let mut complete = 0;
    for (key, record) in progress.iter() {
        if record.is_complete() {
            complete += 1;
        }
        println!(
            "{:<60} {:>10} {:>8} {:>8}  {}",
            display_key(key),
            record.processed,
            record.total,
            display_state(record),
            display_time(&record.last_attempt())
        );
    }

    println!();
    println!("{} of {} collections complete", complete, progress.len());
    Ok(())
}
