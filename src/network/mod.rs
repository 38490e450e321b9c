pub mod client;
pub mod consensus;
pub mod peers;

pub use client::PeerClient;
pub use consensus::{announce, consensus, sync_with};
pub use peers::PeerRegistry;
