// Tiller directive-reasoning engine
// Main entry point for the tiller binary

use clap::Parser;
use tiller_engine::cli::{Cli, Command, ConfigAction};
use tiller_engine::config::Config;
use tiller_engine::handlers::{
    handle_config_path, handle_config_show, handle_run, handle_serve, OutputFormat,
};
use tiller_engine::telemetry::{init_telemetry, init_telemetry_with_level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize basic telemetry first (before config is loaded)
    init_telemetry();

    tracing::info!("Tiller Engine v{}", env!("CARGO_PKG_VERSION"));

    // Determine output format
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    // Load configuration (or use custom path if provided)
    let config = if let Some(config_path) = &cli.config {
        Config::load_from_path(config_path)?
    } else {
        Config::load_or_create()?
    };

    // Re-initialize telemetry with the CLI or config-driven log level
    // (only takes effect if RUST_LOG env var is not set)
    let log_level = cli.log.as_deref().unwrap_or(&config.core.log_level);
    init_telemetry_with_level(log_level);

    match cli.command {
        Command::Run { directive, memory } => {
            handle_run(&directive, memory.as_deref(), &config, format)
        }

        Command::Serve { port } => handle_serve(&config, port).await,

        Command::Config { action } => match action {
            ConfigAction::Show => handle_config_show(&config, format),
            ConfigAction::Path => handle_config_path(),
        },
    }
}
