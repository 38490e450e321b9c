use serde::{Deserialize, Serialize};

use crate::blockchain::Block;

/* ---------- Chain API Models ---------- */

/// Body of `GET /chain` and `POST /register-peer`; also what peers send back
/// during consensus and sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainResponse {
    pub length: usize,
    pub chain: Vec<Block>,
    pub peers: Vec<String>,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    pub difficulty: u32,
}

/* ---------- TX API Models ---------- */

/// Both fields are optional at the serde level so a missing field yields the
/// node's own error body instead of a deserializer message.
#[derive(Deserialize)]
pub struct NewTxRequest {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/* ---------- Peer API Models ---------- */

#[derive(Deserialize)]
pub struct PeerRequest {
    #[serde(default)]
    pub peer_address: Option<String>,
}

/// Returns the value exactly as submitted when present and not blank.
pub fn required(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .filter(|value| !value.trim().is_empty())
}
