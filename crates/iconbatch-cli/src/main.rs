use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod config;
mod env;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("iconbatch=info".parse()?),
        )
        .init();

    // Load the nearest .env file, if any
    env::load_dotenv_from_ancestors()?;

    let cli = Cli::parse();

    let run_config = config::load_config(&cli.config)?;
    let store = config::open_store(&run_config, cli.progress.as_deref());

    match cli.command {
        Commands::Status => commands::cmd_status(&store),
        Commands::Check => commands::cmd_check(&store),
        Commands::Plan => {
            let base_dir = config::config_dir(&cli.config);
            commands::cmd_plan(&run_config, &base_dir, &store)
        }
        Commands::Convert { dry_run } => commands::cmd_convert(&store, dry_run),
        Commands::Reset { yes } => commands::cmd_reset(&store, yes),
    }
}
