//! PHRIS CLI Entry Point
//!
//! This is the main entry point for the phris command-line tool.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use phris_cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay(args) => {
            phris_cli::replay::execute(args).await?;
        }
        Commands::Zones(args) => {
            phris_cli::zones::execute_zones(args).await?;
        }
        Commands::Classify(args) => {
            phris_cli::zones::execute_classify(args).await?;
        }
        Commands::Version => {
            println!("phris {}", env!("CARGO_PKG_VERSION"));
            println!("Risk engine version: {}", phris_core::VERSION);
        }
    }

    Ok(())
}
