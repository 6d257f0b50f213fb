//! CLI module
//!
//! This module defines the command-line interface using clap and implements
//! the command execution logic.

use crate::graph::ViewMode;
use crate::{Config, Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;
pub mod output;

/// NEO transfer graph visualizer CLI
#[derive(Parser, Debug)]
#[command(name = "neo-transfer-viz")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (overrides config, RUST_LOG overrides both)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the transfers of an address and render them as a graph
    Visualize {
        /// Address whose transfers are shown
        #[arg(short, long)]
        address: String,

        /// Data source type (defaults to config)
        #[arg(short, long, value_enum)]
        source: Option<DataSourceType>,

        /// Initial view (defaults to config)
        #[arg(short, long, value_enum)]
        mode: Option<ViewMode>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "tui")]
        output: OutputFormat,

        /// Also write the DOT graph to a timestamped file in this directory
        #[arg(long)]
        export: Option<PathBuf>,

        /// Disable the response cache
        #[arg(long)]
        no_cache: bool,
    },

    /// Show a block by height or hash
    Block {
        /// Block height or 0x-prefixed hash
        id: String,

        #[command(flatten)]
        lookup: LookupArgs,
    },

    /// Show a transaction
    Transaction {
        /// 0x-prefixed transaction id
        txid: String,

        #[command(flatten)]
        lookup: LookupArgs,
    },

    /// Show every transaction of a block
    BlockTransactions {
        /// 0x-prefixed block hash
        hash: String,

        #[command(flatten)]
        lookup: LookupArgs,
    },

    /// Show every transaction sent by an address
    SenderTransactions {
        /// Sender address
        address: String,

        #[command(flatten)]
        lookup: LookupArgs,
    },

    /// Show network-wide statistics
    Stats {
        #[command(flatten)]
        lookup: LookupArgs,
    },

    /// Report which kinds of identifier a value is
    Check {
        /// Value to classify
        value: String,
    },

    /// Resolve a theme colour to hex
    Color {
        /// Hex literal or hsl(H, S%, L%)
        css: String,
    },
}

/// Options shared by the record lookups
#[derive(clap::Args, Debug, Clone)]
pub struct LookupArgs {
    /// Data source type (defaults to config)
    #[arg(short, long, value_enum)]
    pub source: Option<DataSourceType>,

    /// Print JSON instead of a field table
    #[arg(long)]
    pub json: bool,

    /// Disable the response cache
    #[arg(long)]
    pub no_cache: bool,
}

/// Data source types
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DataSourceType {
    /// HTTP query API
    Http,
    /// Mock data for testing
    Mock,
}

impl DataSourceType {
    /// Pick the CLI choice, falling back to `[default] source`
    pub fn resolve(choice: Option<Self>, config: &Config) -> Result<Self> {
        match choice {
            Some(source) => Ok(source),
            None => <Self as ValueEnum>::from_str(&config.default.source, true).map_err(|_| {
                Error::Config(format!("Unknown data source: {}", config.default.source))
            }),
        }
    }
}

/// Output format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON output (cytoscape elements, style and layout)
    Json,
    /// DOT format (Graphviz)
    Dot,
    /// Interactive TUI
    Tui,
    /// Plain text table
    Table,
}

/// Execute the CLI command
pub async fn execute(args: Cli, config: Config) -> Result<()> {
    match args.command {
        Commands::Visualize { .. } => commands::visualize::execute(args, config).await,
        Commands::Block { .. }
        | Commands::Transaction { .. }
        | Commands::BlockTransactions { .. }
        | Commands::SenderTransactions { .. }
        | Commands::Stats { .. } => commands::lookup::execute(args, config).await,
        Commands::Check { value } => commands::check::execute(&value),
        Commands::Color { css } => commands::color::execute(&css),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "neo-transfer-viz",
            "visualize",
            "--address",
            "NSTSntFPK36QXsjEK6oAhnPzSyfgfVA2GQ",
            "--source",
            "mock",
            "--mode",
            "participant",
            "--output",
            "dot",
        ])
        .unwrap();

        match cli.command {
            Commands::Visualize {
                source,
                mode,
                output,
                no_cache,
                ..
            } => {
                assert_eq!(source, Some(DataSourceType::Mock));
                assert_eq!(mode, Some(ViewMode::Participant));
                assert_eq!(output, OutputFormat::Dot);
                assert!(!no_cache);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_lookup_parsing() {
        let cli =
            Cli::try_parse_from(["neo-transfer-viz", "--log-level", "debug", "block", "420", "--json"])
                .unwrap();

        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Commands::Block { id, lookup } => {
                assert_eq!(id, "420");
                assert!(lookup.json);
                assert_eq!(lookup.source, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_stats_and_sender_parsing() {
        let cli = Cli::try_parse_from(["neo-transfer-viz", "stats", "--source", "mock"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Stats { lookup } if lookup.source == Some(DataSourceType::Mock)
        ));

        let cli = Cli::try_parse_from([
            "neo-transfer-viz",
            "sender-transactions",
            "NSTSntFPK36QXsjEK6oAhnPzSyfgfVA2GQ",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::SenderTransactions { .. }));
    }

    #[test]
    fn test_resolve_source_from_config() {
        let mut config = Config::default();
        assert_eq!(
            DataSourceType::resolve(None, &config).unwrap(),
            DataSourceType::Http
        );
        assert_eq!(
            DataSourceType::resolve(Some(DataSourceType::Mock), &config).unwrap(),
            DataSourceType::Mock
        );

        config.default.source = "ftp".to_string();
        assert!(DataSourceType::resolve(None, &config).is_err());
    }
}
