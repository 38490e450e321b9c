use actix_web::rt::task::JoinHandle;
use log::{debug, info, warn};

use crate::api::models::ChainResponse;
use crate::blockchain::{Block, Blockchain};
use crate::error::Result;
use crate::node::NodeState;

/// Longest-chain rule. Polls every known peer and adopts the longest chain
/// that is strictly longer than the local one and fully valid.
///
/// Peers are polled in sorted address order; among equally long winners the
/// first one polled is kept. Unreachable peers are skipped silently.
/// Returns whether the local chain was replaced.
pub async fn consensus(state: &NodeState) -> bool {
    let peers = state.peers.lock().expect("mutex poisoned").to_vec();
    let local_len = state.chain_len();

    let mut candidates = Vec::with_capacity(peers.len());
    for peer in peers {
        match state.client.fetch_chain(&peer).await {
            Ok(dump) => candidates.push((peer, dump)),
            Err(e) => debug!("consensus - skipping {peer}: {e}"),
        }
    }

    let Some((peer, chain)) = select_longest_chain(local_len, candidates, state.difficulty())
    else {
        return false;
    };

    let ledger = match Blockchain::from_dump(chain, state.difficulty()) {
        Ok(ledger) => ledger,
        Err(e) => {
            warn!("consensus - chain from {peer} could not be rebuilt: {e}");
            return false;
        }
    };
    let length = ledger.len();
    let adopted = state.replace_ledger_if_longer(ledger);
    if adopted {
        info!("consensus - adopted chain of length {length} from {peer}");
    }
    adopted
}

/// Pick the winning chain among peer answers, if any beats `local_len`.
pub fn select_longest_chain<I>(
    local_len: usize,
    candidates: I,
    difficulty: u32,
) -> Option<(String, Vec<Block>)>
where
    I: IntoIterator<Item = (String, ChainResponse)>,
{
    let mut best_len = local_len;
    let mut best = None;
    for (peer, dump) in candidates {
        if dump.length != dump.chain.len() {
            debug!(
                "consensus - {peer} reported length {} but sent {} blocks",
                dump.length,
                dump.chain.len()
            );
            continue;
        }
        if dump.length > best_len && Blockchain::is_chain_valid(&dump.chain, difficulty) {
            best_len = dump.length;
            best = Some((peer, dump.chain));
        }
    }
    best
}

/// Best-effort broadcast of a freshly mined block to every known peer.
/// Runs in the background; failures are logged and otherwise ignored.
pub fn announce(state: &NodeState, block: Block) -> JoinHandle<()> {
    let peers = state.peers.lock().expect("mutex poisoned").to_vec();
    let client = state.client.clone();
    actix_web::rt::spawn(async move {
        for peer in peers {
            match client.post_block(&peer, &block).await {
                Ok(()) => debug!("announce - block #{} accepted by {peer}", block.index),
                Err(e) => debug!("announce - block #{} not taken by {peer}: {e}", block.index),
            }
        }
    })
}

/// Bootstrap from `target`: ask it to register `own_address`, then rebuild
/// its chain locally and take over its peer set.
///
/// The local ledger is replaced only after every block of the dump has been
/// re-admitted; a tampered dump leaves local state untouched.
pub async fn sync_with(state: &NodeState, target: &str, own_address: &str) -> Result<()> {
    let dump = state.client.register_with(target, own_address).await?;
    let ledger = Blockchain::from_dump(dump.chain, state.difficulty())?;
    let length = ledger.len();
    state.replace_ledger_and_peers(ledger, |peers| {
        peers.extend_excluding(&dump.peers, own_address);
        peers.extend_excluding([target], own_address);
    });
    info!("sync - adopted chain of length {length} from {target}");
    Ok(())
}
