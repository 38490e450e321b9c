pub mod block;
pub mod model;
pub mod pow;

pub use block::Block;
pub use model::Blockchain;

/// Default Proof-of-Work difficulty (number of leading zero hex digits).
/// Every peer on a network must run with the same value.
pub const DEFAULT_DIFFICULTY: u32 = 2;

/// Highest difficulty a node accepts. Every extra digit multiplies the
/// expected search by 16.
pub const MAX_DIFFICULTY: u32 = 6;
