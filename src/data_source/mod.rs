//! Data source module - Abstraction for fetching data from the query API
//!
//! This module provides a trait-based abstraction for fetching transfer and
//! block data from multiple sources (the HTTP query API, mock data).
//! Every lookup is validated before a request is issued.

use crate::transform::QueryResult;
use crate::validator::{self, QueryInput};
use crate::{Config, Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub mod cache;
pub mod http;
pub mod mock;

use crate::cli::DataSourceType;

/// Block lookup key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockRef {
    Height(u64),
    Hash(String),
}

impl BlockRef {
    /// Parse a user-supplied block height or hash
    pub fn parse(raw: &str) -> Result<Self> {
        match QueryInput::classify(raw) {
            Ok(QueryInput::Height(height)) => Ok(BlockRef::Height(height)),
            Ok(QueryInput::Hash(hash)) => Ok(BlockRef::Hash(hash)),
            _ => Err(Error::invalid_input("block height or hash", raw.trim())),
        }
    }
}

impl fmt::Display for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BlockRef::Height(height) => write!(f, "{}", height),
            BlockRef::Hash(hash) => f.write_str(hash),
        }
    }
}

/// Network-wide totals reported by the query API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkStats {
    /// Current chain height
    pub total_blocks: u64,
    pub total_transactions: u64,
    /// GAS burned as system fees
    pub total_sysfee: f64,
    pub total_transfers: u64,
    /// Distinct transaction senders
    pub total_senders: u64,
    /// Deployed contracts
    pub total_contracts: u64,
}

/// Data source trait for fetching NEO ledger data
///
/// Implementations provide different backends for accessing the data:
/// - `HttpDataSource`: Uses the HTTP query API
/// - `MockDataSource`: Provides hardcoded test data
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch the transfers an address sent or took part in
    async fn get_address_transfers(&self, address: &str) -> Result<QueryResult>;

    /// Fetch a block by height or hash
    async fn get_block(&self, block: &BlockRef) -> Result<Value>;

    /// Fetch a single transaction by id
    async fn get_transaction(&self, txid: &str) -> Result<Value>;

    /// Fetch every transaction of a block
    async fn get_block_transactions(&self, block_hash: &str) -> Result<Value>;

    /// Fetch every transaction sent by an address
    async fn get_sender_transactions(&self, address: &str) -> Result<Value>;

    /// Fetch network-wide statistics
    async fn get_stats(&self) -> Result<NetworkStats>;
}

pub(crate) fn require_address(address: &str) -> Result<()> {
    if validator::is_address(address) {
        Ok(())
    } else {
        Err(Error::invalid_input("address", address))
    }
}

pub(crate) fn require_tx_id(hash: &str) -> Result<()> {
    if validator::is_tx_id(hash) {
        Ok(())
    } else {
        Err(Error::invalid_input("transaction id", hash))
    }
}

/// Create a data source instance based on type and configuration
pub fn create_data_source(
    source_type: DataSourceType,
    config: &Config,
    cache_enabled: bool,
) -> Result<Box<dyn DataSource>> {
    match source_type {
        DataSourceType::Mock => Ok(Box::new(mock::MockDataSource::new())),
        DataSourceType::Http => {
            let mut ds = http::HttpDataSource::new(config.api_base_url()?, config.request_timeout())?
                .with_max_retries(config.api.max_retries)
                .with_retry_delay(config.retry_delay());
            if cache_enabled {
                ds = ds.with_cache(cache::ResponseCache::new(
                    config.cache_ttl(),
                    Some(config.cache_directory()),
                ));
            }
            Ok(Box::new(ds))
        }
    }
}
