//! Cloudboard - admin dashboard console
//!
//! Headless front end over the Cloudboard data layer: sign in, then browse and
//! manage users and items from the terminal.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod console;
mod state;
mod viewmodel;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "cloudboard")]
#[command(version, about = "Admin dashboard console", long_about = None)]
struct Cli {
    /// Path to the configuration file (defaults to config.toml in the data directory)
    #[arg(short, long, env = "CLOUDBOARD_CONFIG")]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Cloudboard");

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize application state
    let app_state = match state::AppState::new(cli.config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(
        data_dir = %app_state.data_dir().display(),
        storage = ?app_state.config.storage.backend,
        latency = ?app_state.config.latency,
        "Application state ready"
    );

    if let Err(e) = runtime.block_on(console::run(&app_state)) {
        tracing::error!("Console error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_config_flag() {
        let cli = Cli::try_parse_from(["cloudboard", "--config", "/tmp/cb.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/cb.toml")));
    }
}
