//! PHRIS CLI
//!
//! Command-line interface for the PHRIS risk engine: replays recorded
//! tracker and pose output through the engine and inspects site zone layouts.
//!
//! # Features
//!
//! - **replay**: Score a recorded session and summarise risk per person
//! - **zones**: List the configured danger zones in priority order
//! - **classify**: Show which zone a point falls into
//! - **version**: Display version information
//!
//! # Usage
//!
//! ```bash
//! # Replay a recorded session against the default industrial layout
//! phris replay --frames session.jsonl
//!
//! # Replay against a site file, JSON output
//! phris replay --frames session.jsonl --config site.toml --format json
//!
//! # Inspect zones
//! phris zones --config site.toml
//! phris classify --x 400 --y 500
//! ```

use clap::{Parser, Subcommand, ValueEnum};

pub mod replay;
pub mod site;
pub mod zones;

/// PHRIS Command Line Interface
#[derive(Parser, Debug)]
#[command(name = "phris")]
#[command(author, version, about = "Proactive human risk intelligence for site safety monitoring")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay recorded tracker and pose output through the risk engine
    Replay(replay::ReplayArgs),

    /// List configured danger zones
    Zones(zones::ZonesArgs),

    /// Classify a point against the configured zones
    Classify(zones::ClassifyArgs),

    /// Display version information
    Version,
}

/// Output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty table output
    #[default]
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_replay() {
        let cli = Cli::try_parse_from([
            "phris", "replay", "--frames", "session.jsonl", "--format", "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Replay(args) => {
                assert_eq!(args.frames, PathBuf::from("session.jsonl"));
                assert_eq!(args.format, OutputFormat::Json);
                assert!(args.config.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_classify() {
        let cli = Cli::try_parse_from(["phris", "classify", "--x", "400", "--y", "500.5"]).unwrap();
        match cli.command {
            Commands::Classify(args) => {
                assert_eq!(args.x, 400.0);
                assert_eq!(args.y, 500.5);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_replay_requires_frames() {
        assert!(Cli::try_parse_from(["phris", "replay"]).is_err());
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
