use std::time::Duration;

use log::debug;
use reqwest::StatusCode;
use serde_json::json;

use super::peers::peer_url;
use crate::api::models::ChainResponse;
use crate::blockchain::Block;
use crate::error::{NodeError, Result};

/// Outbound HTTP calls to other nodes. Cheap to clone; every request is
/// bounded by the timeout given at construction.
#[derive(Clone)]
pub struct PeerClient {
    http: reqwest::Client,
}

impl PeerClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(NodeError::ClientSetup)?;
        Ok(Self { http })
    }

    /// `GET {peer}/chain`.
    pub async fn fetch_chain(&self, peer: &str) -> Result<ChainResponse> {
        let url = peer_url(peer, "chain");
        debug!("GET {url}");
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| unreachable(peer, e))?;
        read_chain(peer, resp).await
    }

    /// `POST {peer}/register-peer` asking the peer to record `own_address`.
    /// Returns the peer's chain and peer set.
    pub async fn register_with(&self, peer: &str, own_address: &str) -> Result<ChainResponse> {
        let url = peer_url(peer, "register-peer");
        debug!("POST {url} (peer_address={own_address})");
        let resp = self
            .http
            .post(&url)
            .json(&json!({ "peer_address": own_address }))
            .send()
            .await
            .map_err(|e| unreachable(peer, e))?;
        read_chain(peer, resp).await
    }

    /// `POST {peer}/add_block`.
    pub async fn post_block(&self, peer: &str, block: &Block) -> Result<()> {
        let url = peer_url(peer, "add_block");
        debug!("POST {url} (block #{})", block.index);
        let resp = self
            .http
            .post(&url)
            .json(block)
            .send()
            .await
            .map_err(|e| unreachable(peer, e))?;
        if resp.status() != StatusCode::CREATED {
            return Err(rejected(resp).await);
        }
        Ok(())
    }
}

async fn read_chain(peer: &str, resp: reqwest::Response) -> Result<ChainResponse> {
    if resp.status() != StatusCode::OK {
        return Err(rejected(resp).await);
    }
    resp.json::<ChainResponse>()
        .await
        .map_err(|e| unreachable(peer, e))
}

async fn rejected(resp: reqwest::Response) -> NodeError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    NodeError::PeerRejected { status, body }
}

fn unreachable(peer: &str, source: reqwest::Error) -> NodeError {
    NodeError::PeerUnreachable {
        address: peer.to_string(),
        source,
    }
}
