//! Transform module - Turn query results into graph-ready records
//!
//! Extraction runs in source order over every transfer of every batch.
//! Addresses are reduced to their first [`ADDRESS_PREFIX_LEN`] characters,
//! so distinct addresses sharing a prefix collapse into one node.

use serde_json::Value;

pub mod models;

pub use models::{GraphEdge, GraphNode, QueryResult, RawTransfer, TransferBatch, TransferRecord};

/// Number of leading characters that identify an address in the graph
pub const ADDRESS_PREFIX_LEN: usize = 5;

/// Record fields holding nested structures that are shown as compact JSON
pub const COMPOSITE_FIELDS: [&str; 5] = [
    "witnesses",
    "signers",
    "stack_result",
    "notifications",
    "transactions",
];

/// Reduce an address to its node identity
pub fn truncate_address(address: &str) -> String {
    address.chars().take(ADDRESS_PREFIX_LEN).collect()
}

/// Flatten a record into ordered `(field, value)` pairs for display
///
/// Key order follows the record. Composite fields are serialized to a
/// string, every other value passes through untouched.
pub fn flatten(record: &Value) -> Vec<(String, Value)> {
    let Value::Object(fields) = record else {
        return vec![("value".to_string(), record.clone())];
    };

    fields
        .iter()
        .map(|(name, value)| {
            if COMPOSITE_FIELDS.contains(&name.as_str()) {
                (name.clone(), Value::String(value.to_string()))
            } else {
                (name.clone(), value.clone())
            }
        })
        .collect()
}

/// Iterate over the transfers of every well-formed batch
fn transfers(batches: &[TransferBatch]) -> impl Iterator<Item = &RawTransfer> {
    batches
        .iter()
        .filter_map(|batch| match &batch.nep17_transfers {
            Some(list) => Some(list),
            None => {
                tracing::warn!(
                    "Skipping transfer batch {} without a readable nep17_transfers list",
                    batch.txid.as_deref().unwrap_or("<unknown>")
                );
                None
            }
        })
        .flatten()
}

/// All transfers with truncated endpoints, in source order
pub fn extract_transfers(batches: &[TransferBatch]) -> Vec<TransferRecord> {
    transfers(batches)
        .map(|t| TransferRecord {
            from: truncate_address(&t.from),
            to: truncate_address(&t.to),
            amount: t.amount,
            asset: t.contract.clone(),
        })
        .collect()
}

/// Distinct truncated senders and recipients, first-seen order
pub fn extract_addresses(batches: &[TransferBatch]) -> Vec<String> {
    let mut addresses: Vec<String> = Vec::new();

    for transfer in transfers(batches) {
        for address in [&transfer.from, &transfer.to] {
            let prefix = truncate_address(address);
            if !addresses.contains(&prefix) {
                addresses.push(prefix);
            }
        }
    }

    addresses
}

/// One edge per transfer event, source order, no aggregation
pub fn extract_edges(batches: &[TransferBatch]) -> Vec<GraphEdge> {
    extract_transfers(batches).iter().map(GraphEdge::from).collect()
}
