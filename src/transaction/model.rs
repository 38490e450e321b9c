use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A client-submitted record waiting in the pending pool or sealed in a block.
/// Fields are declared in the same (sorted) order the block hasher emits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub author: String,
    pub content: String,
    pub timestamp: f64, // Unix seconds, stamped by the receiving node
}

impl Transaction {
    /// Build a transaction stamped with the current time.
    pub fn new(author: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            content: content.into(),
            timestamp: now_secs(),
        }
    }
}

/// Current Unix time in seconds with microsecond resolution.
pub fn now_secs() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::Transaction;

    #[test]
    fn new_stamps_current_time() {
        let tx = Transaction::new("alice", "hello");
        assert_eq!(tx.author, "alice");
        assert_eq!(tx.content, "hello");
        assert!(tx.timestamp > 1_600_000_000.0);
    }

    #[test]
    fn wire_shape_has_only_three_fields() {
        let tx = Transaction {
            author: "bob".into(),
            content: "hi".into(),
            timestamp: 12.5,
        };
        let v = serde_json::to_value(&tx).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert_eq!(obj["timestamp"], 12.5);
    }
}
