pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod network;
pub mod node;
pub mod transaction;

pub use blockchain::{Block, Blockchain};
pub use config::NodeConfig;
pub use error::{NodeError, Result};
pub use node::NodeState;
pub use transaction::Transaction;
