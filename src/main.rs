//! LensCoach - AI photography coach CLI
//!
//! Main entry point for the LensCoach application.

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lenscoach::cli::{Cli, Commands};
use lenscoach::commands;
use lenscoach::config::Config;
use lenscoach::providers::HttpPromptClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    let manager = commands::build_manager(&config, cli.ephemeral)?;

    match cli.command {
        Commands::Ask { prompt, images } => {
            tracing::debug!("Using backend: {}", config.backend.base_url);
            let client = HttpPromptClient::new(&config.backend)?;
            commands::ask::run_ask(&manager, &client, &prompt, &images).await?;
            Ok(())
        }
        Commands::New { title } => {
            commands::run_new(&manager, title)?;
            Ok(())
        }
        Commands::History { command } => {
            tracing::info!("Starting history command");
            commands::history::handle_history(&manager, command)?;
            Ok(())
        }
        Commands::Quota => {
            commands::quota::show_quota(&manager)?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "lenscoach=debug"
    } else {
        "lenscoach=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
