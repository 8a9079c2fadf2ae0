use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;
use iconbatch_state::JsonFileStore;

pub fn cmd_reset(store: &JsonFileStore, yes: bool) -> Result<()> {
    let path = store.path().display();
    if !store.path().exists() {
        println!("No progress file at {path}. Nothing to reset.");
        return Ok(());
    }

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete {path}? Every collection will be processed from the start on the next run."
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Aborting.");
            return Ok(());
        }
    }

    if store.remove()? {
        println!("{} Removed {path}", "✓".green());
    }
    Ok(())
}
