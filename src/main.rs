#![deny(clippy::all, clippy::pedantic)]
//! hotkeyctl: render, validate, record and register macOS keyboard shortcuts.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hotkeyctl::cli::{Cli, OutputCtx, write_error};
use hotkeyctl::commands::{self, CommandError};
use hotkeyctl::config::{Config, ConfigManager};
use hotkeyctl::types::ErrorOutput;

const LOG_ENV: &str = "HOTKEYCTL_LOG";
const DEFAULT_LOG_LEVEL: &str = "warn";

fn init_logging(debug: bool) {
    let fallback = if debug { "debug" } else { DEFAULT_LOG_LEVEL };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config, CommandError> {
    let manager = match &cli.config {
        Some(path) => ConfigManager::from_path(path),
        None => ConfigManager::new().map_err(CommandError::Config)?,
    };
    manager.load().map_err(CommandError::Config)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let ctx = OutputCtx::new(cli.output, cli.json, cli.no_header, cli.debug);

    let result =
        load_config(&cli).and_then(|config| commands::dispatch(&cli.command, &config, &ctx));
    if let Err(err) = result {
        let error_output = ErrorOutput::from_command_error(&err);
        write_error(&error_output, cli.output, cli.json);
        std::process::exit(err.exit_code());
    }
}
