//! Command implementations

mod analyze;
mod config;
mod import;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(cli.config.as_deref(), cli.overrides())?;

    match cli.command {
        Commands::Import(args) => import::execute(args, &config, &output),
        Commands::Analyze(args) => analyze::execute(args, &config, &output, cli.dry_run).await,
        Commands::Config => config::execute(&config, &output),
    }
}
