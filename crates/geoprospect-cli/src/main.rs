//! GeoProspect CLI - Command-line interface
//!
//! Terminal front end for boundary import and exploration analysis runs.

mod cli;
mod commands;
mod config_loader;
mod dry_run;
mod errors;
mod interactive;
mod output;
mod output_types;
mod progress;

use clap::Parser;
use cli::Cli;
use errors::CliError;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Create async runtime
    let runtime = tokio::runtime::Runtime::new()?;

    // Execute the command
    let result = runtime.block_on(async { commands::execute(cli).await });

    match result {
        Ok(()) => Ok(()),
        Err(error) => match error.downcast::<CliError>() {
            Ok(cli_error) => {
                cli_error.display();
                std::process::exit(1);
            }
            Err(other) => Err(other),
        },
    }
}
