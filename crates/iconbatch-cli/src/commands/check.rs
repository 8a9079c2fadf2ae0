use anyhow::{bail, Context, Result};
use colored::Colorize;
use iconbatch_state::{legacy, validate, JsonFileStore, Progress};

pub fn cmd_check(store: &JsonFileStore) -> Result<()> {
    let path = store.path().display();
    let Some(text) = store.read_raw()? else {
        println!("No progress file at {path}. A run will start fresh.");
        return Ok(());
    };

    let raw: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("{path} is not valid JSON"))?;

    if !validate(&raw) {
        if legacy::is_legacy(&raw) {
            bail!("{path} uses the legacy format. Run 'iconbatch convert' to upgrade it.");
        }
        bail!("{path} is not a map of progress records");
    }

    let progress = Progress::parse(&text).with_context(|| format!("Failed to parse {path}"))?;

    let violations = progress.integrity_violations();
    if !violations.is_empty() {
        for key in &violations {
            if let Some(record) = progress.get(key) {
                println!(
                    "{} {key}: processed {} > total {}",
                    "✗".red(),
                    record.processed,
                    record.total
                );
            }
        }
        bail!("{} inconsistent record(s) in {path}", violations.len());
    }

    println!(
        "{} {path}: {} record(s), all consistent",
        "✓".green(),
        progress.len()
    );
    Ok(())
}
