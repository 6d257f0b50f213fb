//! Mock data source for testing and development
//!
//! Provides a small, fixed set of GAS and NEO transfers around
//! [`MOCK_ADDRESS`], plus one block, one transaction record and a set of
//! network statistics.

use super::{BlockRef, DataSource, NetworkStats, require_address, require_tx_id};
use crate::transform::{QueryResult, RawTransfer, TransferBatch};
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::{Value, json};

/// Address the mock transfers are centred on
pub const MOCK_ADDRESS: &str = "NSTSntFPK36QXsjEK6oAhnPzSyfgfVA2GQ";

/// Hash of the single mock block
pub const MOCK_BLOCK_HASH: &str =
    "0xeaa8a71a27a5172743100ba71e3bccafe951d641f5fb4bc5fcfb4cf91fcb43b4";

/// Id of the single mock transaction
pub const MOCK_TX_ID: &str = "0x72a4073d926405d0d40ebea07a1438744e73cd8accb6a09efb1def5f19110145";

const MOCK_BLOCK_HEIGHT: u64 = 420;

const GAS: &str = "0xd2a4cff31913016155e38e474a2c06d08be276cf";
const NEO: &str = "0xef4073a0f2b305a38ec4050e4d3d28bc40ea63f5";

const PEERS: [&str; 3] = [
    "NhGomBpYnKXArr55nHRQ5rzy79TwKVXZbr",
    "NZs2zXSPuuv9ZF6TDGSWT1RBmE8rfGj7UW",
    "NVg7LjGcUSrgxgjX3zEgqaksfMaiS8Z6e1",
];

/// Mock data source providing hardcoded sample data
pub struct MockDataSource {
    transfers: QueryResult,
}

impl Default for MockDataSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDataSource {
    pub fn new() -> Self {
        let [bob, carol, dave] = PEERS;
        let transfers = QueryResult {
            address: Some(MOCK_ADDRESS.to_string()),
            as_sender: vec![
                TransferBatch::new(vec![
                    RawTransfer::new(MOCK_ADDRESS, bob, 12.5, GAS),
                    RawTransfer::new(MOCK_ADDRESS, carol, 3.0, GAS),
                ])
                .with_txid(MOCK_TX_ID),
                TransferBatch::new(vec![RawTransfer::new(MOCK_ADDRESS, bob, 10.0, NEO)])
                    .with_txid("0x1f0ea4b5a3b1c0e9d6e27f5c1fbcbf3dd2a51a0c3d6a3d4f4a0e9b8d7c6b5a49"),
            ],
            as_participant: vec![
                TransferBatch::new(vec![RawTransfer::new(bob, MOCK_ADDRESS, 1.25, GAS)])
                    .with_txid("0x5d3c0f9e8a7b6c5d4e3f2a1b0c9d8e7f6a5b4c3d2e1f0a9b8c7d6e5f4a3b2c1d"),
                TransferBatch::new(vec![
                    RawTransfer::new(dave, MOCK_ADDRESS, 40.0, NEO),
                    RawTransfer::new(MOCK_ADDRESS, carol, 0.5, GAS),
                ])
                .with_txid("0x9a8b7c6d5e4f3a2b1c0d9e8f7a6b5c4d3e2f1a0b9c8d7e6f5a4b3c2d1e0f9a8b"),
            ],
        };

        Self { transfers }
    }

    fn block_record() -> Value {
        json!({
            "index": MOCK_BLOCK_HEIGHT,
            "hash": MOCK_BLOCK_HASH,
            "size": 697,
            "version": 0,
            "merkle_root": "0x0000000000000000000000000000000000000000000000000000000000000000",
            "time": 1_689_000_000_000u64,
            "nonce": "5FE7C2B8D10C9A11",
            "speaker": 3,
            "next_consensus": "NVg7LjGcUSrgxgjX3zEgqaksfMaiS8Z6e1",
            "reward": 0.5,
            "reward_receiver": PEERS[0],
            "witnesses": [{"invocation": "DEDx", "verification": "EwwhA"}],
            "transactions": [MOCK_TX_ID]
        })
    }

    fn transaction_record() -> Value {
        json!({
            "index": 1,
            "hash": MOCK_TX_ID,
            "block_hash": MOCK_BLOCK_HASH,
            "vm_state": "HALT",
            "size": 250,
            "version": 0,
            "nonce": 1_234_567u64,
            "sender": MOCK_ADDRESS,
            "sysfee": "0.0997775",
            "netfee": "0.0124752",
            "valid_until": 2_000_000u64,
            "signers": [{"account": "0x2e0bd9d3c0e4a4b5b0b8f6c8e2b7b6d4f3a2c1b0", "scopes": "CalledByEntry"}],
            "script": "CxEUwB8MCHRyYW5zZmVy",
            "witnesses": [{"invocation": "DEA", "verification": "DCE"}],
            "stack_result": [{"type": "Boolean", "value": true}],
            "notifications": [{"contract": GAS, "eventname": "Transfer"}]
        })
    }

    fn require_block_hash(&self, hash: &str) -> Result<()> {
        if hash == MOCK_BLOCK_HASH {
            Ok(())
        } else {
            Err(Error::Api("Block does not exist.".to_string()))
        }
    }
}

#[async_trait]
impl DataSource for MockDataSource {
    async fn get_address_transfers(&self, address: &str) -> Result<QueryResult> {
        require_address(address)?;
        if address == MOCK_ADDRESS {
            Ok(self.transfers.clone())
        } else {
            Err(Error::Api("No transfers for that address.".to_string()))
        }
    }

    async fn get_block(&self, block: &BlockRef) -> Result<Value> {
        match block {
            BlockRef::Height(MOCK_BLOCK_HEIGHT) => Ok(Self::block_record()),
            BlockRef::Hash(hash) => {
                self.require_block_hash(hash)?;
                Ok(Self::block_record())
            }
            BlockRef::Height(_) => Err(Error::Api("Block does not exist.".to_string())),
        }
    }

    async fn get_transaction(&self, txid: &str) -> Result<Value> {
        require_tx_id(txid)?;
        if txid == MOCK_TX_ID {
            Ok(Self::transaction_record())
        } else {
            Err(Error::Api("Transaction does not exist.".to_string()))
        }
    }

    async fn get_block_transactions(&self, block_hash: &str) -> Result<Value> {
        require_tx_id(block_hash)?;
        self.require_block_hash(block_hash)?;
        Ok(json!({ "transactions": [Self::transaction_record()] }))
    }

    async fn get_sender_transactions(&self, address: &str) -> Result<Value> {
        require_address(address)?;
        if address == MOCK_ADDRESS {
            Ok(json!({ "transactions": [Self::transaction_record()] }))
        } else {
            Err(Error::Api("No transactions for that sender.".to_string()))
        }
    }

    async fn get_stats(&self) -> Result<NetworkStats> {
        Ok(NetworkStats {
            total_blocks: MOCK_BLOCK_HEIGHT + 1,
            total_transactions: 1,
            total_sysfee: 0.0997775,
            total_transfers: 5,
            total_senders: 1,
            total_contracts: 9,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ViewMode, build_view};

    #[tokio::test]
    async fn test_mock_transfers_build_graph() {
        let ds = MockDataSource::new();
        let result = ds.get_address_transfers(MOCK_ADDRESS).await.unwrap();

        let sender = build_view(Some(&result), ViewMode::Sender);
        assert_eq!(sender.nodes.len(), 3);
        assert_eq!(sender.edges.len(), 3);

        let participant = build_view(Some(&result), ViewMode::Participant);
        assert_eq!(participant.nodes.len(), 4);
        assert_eq!(participant.edges.len(), 3);
    }

    #[tokio::test]
    async fn test_mock_rejects_unknown_and_invalid() {
        let ds = MockDataSource::new();

        let err = ds.get_address_transfers(PEERS[0]).await.unwrap_err();
        assert!(matches!(err, Error::Api(_)));

        let err = ds.get_address_transfers("0x01").await.unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[tokio::test]
    async fn test_mock_block_lookup() {
        let ds = MockDataSource::new();

        let by_height = ds.get_block(&BlockRef::Height(420)).await.unwrap();
        let by_hash = ds
            .get_block(&BlockRef::Hash(MOCK_BLOCK_HASH.to_string()))
            .await
            .unwrap();
        assert_eq!(by_height, by_hash);
        assert!(ds.get_block(&BlockRef::Height(1)).await.is_err());

        let txs = ds.get_block_transactions(MOCK_BLOCK_HASH).await.unwrap();
        assert_eq!(txs["transactions"][0]["hash"], MOCK_TX_ID);
    }

    #[tokio::test]
    async fn test_mock_sender_transactions() {
        let ds = MockDataSource::new();

        let txs = ds.get_sender_transactions(MOCK_ADDRESS).await.unwrap();
        assert_eq!(txs["transactions"][0]["sender"], MOCK_ADDRESS);

        let err = ds.get_sender_transactions(PEERS[1]).await.unwrap_err();
        assert!(matches!(err, Error::Api(_)));
        assert!(ds.get_sender_transactions("NSTS").await.unwrap_err().is_invalid_input());
    }

    #[tokio::test]
    async fn test_mock_stats() {
        let stats = MockDataSource::new().get_stats().await.unwrap();
        assert_eq!(stats.total_blocks, 421);
        assert_eq!(stats.total_senders, 1);
    }

    #[tokio::test]
    async fn test_mock_transaction_lookup() {
        let ds = MockDataSource::new();
        let tx = ds.get_transaction(MOCK_TX_ID).await.unwrap();
        assert_eq!(tx["vm_state"], "HALT");
    }
}
