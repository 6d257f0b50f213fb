//! NEO Transfer Graph Visualizer
//!
//! Turns the NEP-17 transfers of a NEO N3 address into a directed graph.
//!
//! This library provides functionality for:
//! - Validating addresses, script hashes, transaction ids and block heights
//! - Fetching transfer, block and transaction records from the query API
//! - Building sender and participant transfer graphs
//! - Resolving the theme into a renderer stylesheet
//! - Rendering graphs as cytoscape JSON, Graphviz DOT, a table or a TUI

pub mod cli;
pub mod color;
pub mod config;
pub mod data_source;
pub mod error;
pub mod graph;
pub mod render;
pub mod transform;
pub mod tui;
pub mod validator;

pub use config::Config;
pub use error::{Error, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging with the given log level
///
/// Logs go to `file` when given, stderr otherwise, so stdout stays free for
/// graph and record output. `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &str, file: Option<&std::path::Path>) -> Result<()> {
    use tracing_subscriber::fmt::writer::BoxMakeWriter;
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let writer = match file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            BoxMakeWriter::new(std::sync::Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(file.is_none()),
        )
        .init();

    Ok(())
}
