use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "iconbatch")]
#[command(about = "Inspect and maintain progress of bulk icon-collection runs")]
#[command(version)]
pub struct Cli {
    /// Path to iconbatch.toml config file
    #[arg(short, long, global = true, default_value = "iconbatch.toml")]
    pub config: PathBuf,

    /// Progress file to use instead of the configured one
    #[arg(short, long, global = true)]
    pub progress: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show recorded progress per collection
    Status,

    /// Validate the progress file and report inconsistent records
    Check,

    /// Show where a run would resume each configured collection
    Plan,

    /// Convert a legacy progress file to the current format
    Convert {
        /// Print the converted records without writing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Delete the progress file so the next run starts from scratch
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}
