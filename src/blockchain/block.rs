use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::transaction::{Transaction, model::now_secs};

/// Sentinel predecessor hash carried by the genesis block.
pub const GENESIS_PRED_HASH: &str = "0";

/// A single block in the chain holding an ordered batch of transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub timestamp: f64, // Unix seconds
    pub pred_hash: String,
    pub nonce: u64, // Proof-of-Work nonce
    /// Set once the block is sealed; `None` while unmined.
    #[serde(default)]
    pub hash: Option<String>,
}

impl Block {
    /// The fixed first block. Hashed but never mined, so every node derives
    /// the same genesis independently.
    pub fn genesis() -> Self {
        let mut block = Self {
            index: 0,
            transactions: Vec::new(),
            timestamp: 0.0,
            pred_hash: GENESIS_PRED_HASH.to_string(),
            nonce: 0,
            hash: None,
        };
        block.hash = Some(block.compute_hash());
        block
    }

    /// Create a new unmined block stamped with the current time.
    pub fn new(index: u64, pred_hash: String, transactions: Vec<Transaction>) -> Self {
        Self {
            index,
            transactions,
            timestamp: now_secs(),
            pred_hash,
            nonce: 0,
            hash: None,
        }
    }

    /// Canonical serialization: a JSON object with sorted keys in which the
    /// hash slot is always present and always empty (`null`), whatever the
    /// block currently holds.
    pub fn canonical_json(&self) -> String {
        let value = json!({
            "hash": null,
            "index": self.index,
            "nonce": self.nonce,
            "pred_hash": self.pred_hash,
            "timestamp": self.timestamp,
            "transactions": self.transactions,
        });
        value.to_string()
    }

    /// SHA-256 over the canonical serialization, hex encoded.
    pub fn compute_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_json().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// The sealed hash, or an empty string for an unmined block.
    pub fn hash_str(&self) -> &str {
        self.hash.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::{Block, GENESIS_PRED_HASH};
    use crate::transaction::Transaction;

    fn tx(author: &str, content: &str) -> Transaction {
        Transaction {
            author: author.into(),
            content: content.into(),
            timestamp: 1_700_000_000.25,
        }
    }

    #[test]
    fn genesis_is_identical_across_nodes() {
        let a = Block::genesis();
        let b = Block::genesis();
        assert_eq!(a.hash, b.hash);
        assert_eq!(a.index, 0);
        assert_eq!(a.pred_hash, GENESIS_PRED_HASH);
        assert_eq!(a.nonce, 0);
        assert!(a.transactions.is_empty());
        assert_eq!(a.hash.as_deref(), Some(a.compute_hash().as_str()));
    }

    #[test]
    fn digest_ignores_current_hash_value() {
        let mut b = Block::new(1, "abc".into(), vec![tx("alice", "hello")]);
        let unsealed = b.compute_hash();
        b.hash = Some("whatever".into());
        assert_eq!(unsealed, b.compute_hash());
    }

    #[test]
    fn canonical_json_sorts_keys_and_keeps_empty_slot() {
        let b = Block {
            index: 1,
            transactions: vec![tx("a", "b")],
            timestamp: 2.5,
            pred_hash: "p".into(),
            nonce: 7,
            hash: Some("h".into()),
        };
        assert_eq!(
            b.canonical_json(),
            r#"{"hash":null,"index":1,"nonce":7,"pred_hash":"p","timestamp":2.5,"transactions":[{"author":"a","content":"b","timestamp":1700000000.25}]}"#
        );
    }

    #[test]
    fn digest_changes_when_content_is_tampered() {
        let mut b = Block::new(1, "abc".into(), vec![tx("alice", "hello")]);
        let before = b.compute_hash();
        b.transactions[0].content = "goodbye".into();
        assert_ne!(before, b.compute_hash());
    }

    #[test]
    fn block_json_survives_the_wire() {
        let mut b = Block::new(3, "prev".into(), vec![tx("carol", "post")]);
        b.hash = Some(b.compute_hash());
        let wire = serde_json::to_string(&b).unwrap();
        let back: Block = serde_json::from_str(&wire).unwrap();
        assert_eq!(back.compute_hash(), b.compute_hash());
        assert_eq!(back, b);
    }
}
