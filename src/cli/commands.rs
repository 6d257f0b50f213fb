//! CLI command implementations
//!
//! This module contains the implementation for each CLI command.

use crate::cli::{Cli, Commands, DataSourceType};
use crate::data_source::{DataSource, create_data_source};
use crate::{Config, Result};

fn open_source(
    choice: Option<DataSourceType>,
    config: &Config,
    no_cache: bool,
) -> Result<Box<dyn DataSource>> {
    let source = DataSourceType::resolve(choice, config)?;
    let cache = config.cache.enabled && !no_cache;
    tracing::debug!("Using data source: {:?} (cache: {})", source, cache);
    create_data_source(source, config, cache)
}

/// Visualize command implementation
pub mod visualize {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::graph::ViewState;
    use crate::render::{MountHost, StreamFormat, StreamRenderer, export_dot};

    const STDOUT_TARGET: &str = "stdout";

    /// Execute the visualize command
    pub async fn execute(args: Cli, config: Config) -> Result<()> {
        let (address, source, mode, output_format, export, no_cache) = match args.command {
            Commands::Visualize {
                address,
                source,
                mode,
                output,
                export,
                no_cache,
            } => (address, source, mode, output, export, no_cache),
            _ => unreachable!("visualize::execute called with wrong command"),
        };

        let data_source = open_source(source, &config, no_cache)?;
        let theme = config.theme_vars();
        let mut view = ViewState::new().with_mode(mode.unwrap_or(config.default.mode));

        tracing::info!("Fetching transfers for {}", address);
        let ticket = view.begin_query();
        let result = data_source.get_address_transfers(address.trim()).await?;
        view.resolve(ticket, result);

        let bundle = view.bundle(&theme)?;
        tracing::info!(
            "{} view: {} nodes, {} edges",
            view.mode(),
            bundle.elements.nodes.len(),
            bundle.elements.edges.len()
        );

        if let Some(dir) = export {
            let path = export_dot(&bundle, &dir)?;
            eprintln!("Graph exported to {}", path.display());
        }

        let format = match output_format {
            OutputFormat::Json => StreamFormat::Json,
            OutputFormat::Dot => StreamFormat::Dot,
            OutputFormat::Table => StreamFormat::Table,
            OutputFormat::Tui => {
                tracing::info!("Launching TUI...");
                return crate::tui::run(view, theme, data_source.into());
            }
        };

        let mut host = MountHost::new();
        let renderer = StreamRenderer::new(std::io::stdout(), format);
        host.draw(STDOUT_TARGET, Box::new(renderer), &bundle)?;
        host.unmount(STDOUT_TARGET);

        Ok(())
    }
}

/// Record lookups: blocks, transactions, sender history and network stats
pub mod lookup {
    use super::*;
    use crate::cli::output::{output_json, output_table, output_tables};
    use crate::data_source::{BlockRef, NetworkStats};
    use serde_json::Value;
    use std::io::Write;

    /// Execute one of the record lookup commands
    pub async fn execute(args: Cli, config: Config) -> Result<()> {
        let mut stdout = std::io::stdout();

        match args.command {
            Commands::Block { id, lookup } => {
                let block = BlockRef::parse(&id)?;
                let ds = open_source(lookup.source, &config, lookup.no_cache)?;
                tracing::info!("Fetching block {}", block);
                let record = ds.get_block(&block).await?;
                print_record(&mut stdout, "Block", &record, lookup.json)
            }
            Commands::Transaction { txid, lookup } => {
                let ds = open_source(lookup.source, &config, lookup.no_cache)?;
                tracing::info!("Fetching transaction {}", txid);
                let record = ds.get_transaction(txid.trim()).await?;
                print_record(&mut stdout, "Transaction", &record, lookup.json)
            }
            Commands::BlockTransactions { hash, lookup } => {
                let ds = open_source(lookup.source, &config, lookup.no_cache)?;
                tracing::info!("Fetching transactions of block {}", hash);
                let record = ds.get_block_transactions(hash.trim()).await?;
                print_transactions(&mut stdout, &record, lookup.json)
            }
            Commands::SenderTransactions { address, lookup } => {
                let ds = open_source(lookup.source, &config, lookup.no_cache)?;
                tracing::info!("Fetching transactions sent by {}", address);
                let record = ds.get_sender_transactions(address.trim()).await?;
                print_transactions(&mut stdout, &record, lookup.json)
            }
            Commands::Stats { lookup } => {
                let ds = open_source(lookup.source, &config, lookup.no_cache)?;
                tracing::info!("Fetching network statistics");
                let stats = ds.get_stats().await?;
                print_stats(&mut stdout, &stats, lookup.json)
            }
            _ => unreachable!("lookup::execute called with wrong command"),
        }
    }

    fn print_record(w: &mut impl Write, title: &str, record: &Value, json: bool) -> Result<()> {
        if json {
            output_json(w, record)
        } else {
            output_table(w, title, record)
        }
    }

    /// Print a `{"transactions": [...]}` record, one table per transaction
    pub fn print_transactions(w: &mut impl Write, record: &Value, json: bool) -> Result<()> {
        if json {
            return output_json(w, record);
        }
        match record.get("transactions") {
            Some(list) => output_tables(w, "Transaction", list),
            None => output_tables(w, "Transaction", record),
        }
    }

    pub fn print_stats(w: &mut impl Write, stats: &NetworkStats, json: bool) -> Result<()> {
        let record = serde_json::to_value(stats)?;
        print_record(w, "Network Statistics", &record, json)
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::data_source::DataSource;
        use crate::data_source::mock::{MOCK_ADDRESS, MockDataSource};

        #[tokio::test]
        async fn test_print_stats_table() {
            let stats = MockDataSource::new().get_stats().await.unwrap();
            let mut output = Vec::new();
            print_stats(&mut output, &stats, false).unwrap();
            let text = String::from_utf8(output).unwrap();

            let lines: Vec<&str> = text.lines().collect();
            assert_eq!(lines[0], "Network Statistics");
            assert!(lines[2].starts_with("total_blocks"));
            assert!(lines[2].ends_with("421"));
            assert!(text.contains("total_sysfee"));
        }

        #[tokio::test]
        async fn test_print_stats_json() {
            let stats = MockDataSource::new().get_stats().await.unwrap();
            let mut output = Vec::new();
            print_stats(&mut output, &stats, true).unwrap();

            let parsed: NetworkStats = serde_json::from_slice(&output).unwrap();
            assert_eq!(parsed, stats);
        }

        #[tokio::test]
        async fn test_print_sender_transactions() {
            let record = MockDataSource::new()
                .get_sender_transactions(MOCK_ADDRESS)
                .await
                .unwrap();
            let mut output = Vec::new();
            print_transactions(&mut output, &record, false).unwrap();
            let text = String::from_utf8(output).unwrap();

            assert!(text.contains("Transaction #1"));
            assert!(text.contains(MOCK_ADDRESS));
        }
    }
}

/// Check command implementation
pub mod check {
    use super::*;
    use crate::validator::{self, QueryInput};
    use std::io::Write;

    /// Execute the check command
    pub fn execute(value: &str) -> Result<()> {
        report(&mut std::io::stdout(), value)
    }

    fn mark(accepted: bool) -> &'static str {
        if accepted { "yes" } else { "no" }
    }

    /// Write which predicates accept `value`
    pub fn report(w: &mut impl Write, value: &str) -> Result<()> {
        writeln!(w, "Value: {:?}", value)?;
        writeln!(w, "  address:          {}", mark(validator::is_address(value)))?;
        writeln!(w, "  script hash:      {}", mark(validator::is_script_hash(value)))?;
        writeln!(w, "  transaction id:   {}", mark(validator::is_tx_id(value)))?;
        writeln!(w, "  block height:     {}", mark(validator::is_height(value)))?;

        match QueryInput::classify(value) {
            Ok(QueryInput::Height(height)) => writeln!(w, "Lookup as block height {}", height)?,
            Ok(QueryInput::Hash(hash)) => writeln!(w, "Lookup as block or transaction {}", hash)?,
            Ok(QueryInput::Address(address)) => writeln!(w, "Lookup as address {}", address)?,
            Err(e) => writeln!(w, "Not searchable: {}", e)?,
        }
        Ok(())
    }

}

/// Color command implementation
pub mod color {
    use super::*;
    use crate::color::parse_if_hsl;

    /// Execute the color command
    pub fn execute(css: &str) -> Result<()> {
        let resolved = parse_if_hsl(css)?;
        println!("{}", resolved);
        Ok(())
    }
}
