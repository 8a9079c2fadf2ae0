use anyhow::{bail, Context, Result};
use colored::Colorize;
use iconbatch_state::{legacy, validate, JsonFileStore, ProgressStore};

pub fn cmd_convert(store: &JsonFileStore, dry_run: bool) -> Result<()> {
    let path = store.path().display();
    let Some(text) = store.read_raw()? else {
        bail!("No progress file at {path}");
    };

    let raw: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("{path} is not valid JSON"))?;

    if validate(&raw) {
        println!("{path} is already in the current format. Nothing to convert.");
        return Ok(());
    }
    if !legacy::is_legacy(&raw) {
        bail!("{path} is neither a current nor a legacy progress file");
    }

    let progress = legacy::convert(&raw).context("Failed to convert legacy progress")?;

    if dry_run {
        println!("{}", progress.to_json_pretty()?);
        println!("\n{}", "Dry run: nothing written.".yellow());
        return Ok(());
    }

    if let Some(backup) = store.quarantine()? {
        println!("Saved original to {}", backup.display());
    }
    store
        .write(&progress)
        .with_context(|| format!("Failed to write {path}"))?;

    println!(
        "{} Converted {} record(s) in {path}",
        "✓".green(),
        progress.len()
    );
    Ok(())
}
