//! Heimdall CLI entry point.

use anyhow::Result;
use clap::Parser;
use heimdall::cli::{commands, Cli, Commands};
use heimdall::config::{LogFormat, Settings};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.as_ref().map(PathBuf::from);
    let mut settings = Settings::load_from(config_path.as_ref())?;

    // Command-line overrides
    if cli.log_http {
        settings.logging.log_http = true;
    }
    if let Some(format) = &cli.log_format {
        settings.logging.format = format
            .parse::<LogFormat>()
            .map_err(|e| anyhow::anyhow!(e))?;
    }

    // Initialize logging
    heimdall::logging::init(&settings.logging, cli.verbose)?;

    // Execute command
    match &cli.command {
        Commands::Ask { prompt, model } => {
            commands::run_ask(prompt, model.clone(), settings).await?;
        }

        Commands::Format { file, plain } => {
            commands::run_format(file, *plain)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, config_path)?;
        }
    }

    Ok(())
}
