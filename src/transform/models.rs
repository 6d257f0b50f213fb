//! Query API data models
//!
//! Shapes returned by the transfer query endpoint. Decoding is lenient field
//! by field: a batch whose `nep17_transfers` is missing or not a list keeps
//! `nep17_transfers = None` and is skipped by the extractors, an undecodable
//! entry inside the list drops only that entry, and a wrongly typed
//! ancillary field (`txid`, `time`, fees) reads as `None` without touching
//! the transfers.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Transfers touching one address, split by the role the address played
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResult {
    /// Address the query was issued for
    #[serde(default)]
    pub address: Option<String>,

    /// Transactions sent by the address
    #[serde(default, deserialize_with = "lenient_batches")]
    pub as_sender: Vec<TransferBatch>,

    /// Transactions the address took part in
    #[serde(default, deserialize_with = "lenient_batches")]
    pub as_participant: Vec<TransferBatch>,
}

/// Transfer events emitted by a single transaction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransferBatch {
    #[serde(default, deserialize_with = "lenient_text")]
    pub txid: Option<String>,

    /// Block time (unix seconds)
    #[serde(default, deserialize_with = "lenient_time")]
    pub time: Option<u64>,

    #[serde(default, deserialize_with = "lenient_amount")]
    pub sysfee: Option<f64>,

    #[serde(default, deserialize_with = "lenient_amount")]
    pub netfee: Option<f64>,

    #[serde(default, deserialize_with = "lenient_transfers")]
    pub nep17_transfers: Option<Vec<RawTransfer>>,
}

impl TransferBatch {
    pub fn new(transfers: Vec<RawTransfer>) -> Self {
        Self {
            nep17_transfers: Some(transfers),
            ..Self::default()
        }
    }

    pub fn with_txid(mut self, txid: impl Into<String>) -> Self {
        self.txid = Some(txid.into());
        self
    }
}

/// A single NEP-17 transfer event as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransfer {
    pub from: String,
    pub to: String,

    /// Either a JSON number or a numeric string
    #[serde(deserialize_with = "number_or_string")]
    pub amount: f64,

    /// Script hash of the token contract
    pub contract: String,
}

impl RawTransfer {
    pub fn new(from: &str, to: &str, amount: f64, contract: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            amount,
            contract: contract.to_string(),
        }
    }
}

/// A transfer with both endpoints reduced to their node identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub asset: String,
}

/// Graph node, identified by a truncated address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
}

/// Graph edge for a single transfer
///
/// The id is the concatenation of the two truncated endpoints, so repeated
/// transfers between the same pair share an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub weight: f64,
    pub source: String,
    pub target: String,
}

impl From<&TransferRecord> for GraphEdge {
    fn from(record: &TransferRecord) -> Self {
        Self {
            id: format!("{}{}", record.from, record.to),
            weight: record.amount,
            source: record.from.clone(),
            target: record.to.clone(),
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// Numbers and numeric strings; anything else reads as `None`
fn amount_of(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    amount.filter(|n| n.is_finite())
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(amount_of))
}

fn lenient_time<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) if n.is_u64() => n.as_u64(),
        Some(other) => amount_of(&other)
            .filter(|t| *t >= 0.0)
            .map(|t| t.trunc() as u64),
        None => None,
    })
}

fn lenient_transfers<'de, D>(deserializer: D) -> Result<Option<Vec<RawTransfer>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(Value::Array(entries)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let transfers = entries
        .into_iter()
        .enumerate()
        .filter_map(|(idx, entry)| match serde_json::from_value::<RawTransfer>(entry) {
            Ok(transfer) => Some(transfer),
            Err(e) => {
                tracing::warn!("Dropping undecodable transfer entry {}: {}", idx, e);
                None
            }
        })
        .collect();

    Ok(Some(transfers))
}

fn lenient_batches<'de, D>(deserializer: D) -> Result<Vec<TransferBatch>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = value else {
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .map(|item| match item {
            Value::Object(_) => serde_json::from_value(item).unwrap_or_else(|e| {
                tracing::warn!("Unreadable transfer batch: {}", e);
                TransferBatch::default()
            }),
            _ => TransferBatch::default(),
        })
        .collect())
}

fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Number(f64),
        Text(String),
    }

    match RawAmount::deserialize(deserializer)? {
        RawAmount::Number(n) => Ok(n),
        RawAmount::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid amount {:?}", s))),
    }
}
