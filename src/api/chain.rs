use actix_web::{HttpResponse, get, post, web};
use log::{info, warn};

use super::models::ValidateResponse;
use crate::blockchain::{Block, Blockchain};
use crate::error::NodeError;
use crate::node::NodeState;

/// Full chain, its length and the known peers.
#[get("/chain")]
pub async fn get_chain(state: web::Data<NodeState>) -> HttpResponse {
    HttpResponse::Ok().json(state.chain_snapshot())
}

/// Validate the whole local chain.
#[get("/validate")]
pub async fn validate_chain(state: web::Data<NodeState>) -> HttpResponse {
    let bc = state.blockchain.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(ValidateResponse {
        valid: Blockchain::is_chain_valid(bc.chain(), bc.difficulty()),
        length: bc.len(),
        difficulty: bc.difficulty(),
    })
}

/// Accept a block mined by another peer.
#[post("/add_block")]
pub async fn add_block(
    state: web::Data<NodeState>,
    body: web::Json<Block>,
) -> Result<HttpResponse, NodeError> {
    let block = body.into_inner();
    let index = block.index;
    let proof = block.hash.clone().unwrap_or_default();

    let mut bc = state.blockchain.lock().expect("mutex poisoned");
    if let Err(e) = bc.add_block(block, &proof) {
        warn!("POST /add_block - discarded block #{index}: {e}");
        return Err(e);
    }
    info!("POST /add_block - block #{index} added (hash={proof})");
    Ok(HttpResponse::Created().body("Block was added to the peers' chain"))
}
