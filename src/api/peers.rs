use actix_web::{HttpRequest, HttpResponse, post, web};
use log::{info, warn};

use super::models::{PeerRequest, required};
use crate::error::NodeError;
use crate::network::sync_with;
use crate::node::NodeState;

/// Add a new peer to the network and hand it our chain.
#[post("/register-peer")]
pub async fn register_peer(
    state: web::Data<NodeState>,
    body: web::Json<PeerRequest>,
) -> Result<HttpResponse, NodeError> {
    let address = required(&body.peer_address).ok_or(NodeError::MissingPeerAddress)?;
    if state.peers.lock().expect("mutex poisoned").register(address) {
        info!("POST /register-peer - new peer {address}");
    }
    Ok(HttpResponse::Ok().json(state.chain_snapshot()))
}

/// Sync this node with the peer named in the body.
#[post("/sync-with")]
pub async fn sync_with_peer(
    req: HttpRequest,
    state: web::Data<NodeState>,
    body: web::Json<PeerRequest>,
) -> Result<HttpResponse, NodeError> {
    let target = required(&body.peer_address).ok_or(NodeError::MissingPeerAddress)?;
    let own_address = match &state.config.advertised_address {
        Some(address) => address.clone(),
        None => {
            let info = req.connection_info();
            format!("{}://{}", info.scheme(), info.host())
        }
    };

    if let Err(e) = sync_with(&state, target, &own_address).await {
        warn!("POST /sync-with - sync with {target} failed: {e}");
        return Err(e);
    }
    Ok(HttpResponse::Ok().body("Sync successful"))
}
