use actix_web::{HttpResponse, get, web};
use log::info;

use crate::error::NodeError;
use crate::network::{announce, consensus};
use crate::node::{NodeState, mine_pending};

/// Mine the pending pool into a block, then:
/// - run consensus in case a peer already holds a longer chain
/// - announce the block only if our chain survived consensus unchanged
///
/// Reports the mined block even when consensus replaced it.
#[get("/mine")]
pub async fn mine(state: web::Data<NodeState>) -> Result<HttpResponse, NodeError> {
    let Some(block) = mine_pending(state.clone()).await? else {
        return Ok(HttpResponse::Ok().body("No transactions to mine"));
    };

    let chain_length = state.chain_len();
    consensus(&state).await;
    if chain_length == state.chain_len() {
        announce(&state, block.clone());
    } else {
        info!(
            "MINER - block #{} superseded by a longer peer chain, not announced",
            block.index
        );
    }

    Ok(HttpResponse::Ok().body(format!("Block #{} is mined.", block.index)))
}
