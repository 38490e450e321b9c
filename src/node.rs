use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use actix_web::web;
use log::{info, warn};

use crate::api::models::ChainResponse;
use crate::blockchain::pow::proof_of_work_until;
use crate::blockchain::{Block, Blockchain};
use crate::config::NodeConfig;
use crate::error::{NodeError, Result};
use crate::network::{PeerClient, PeerRegistry};

/// Everything a node shares between concurrently handled requests.
///
/// Lock order is `blockchain` then `peers`. Neither lock is held across an
/// `.await` or while proof of work runs.
pub struct NodeState {
    pub blockchain: Mutex<Blockchain>,
    pub peers: Mutex<PeerRegistry>,
    /// Bumped (under the `blockchain` lock) every time the ledger is
    /// replaced wholesale. In-flight mining polls it to notice a stale tip.
    chain_epoch: AtomicU64,
    pub client: PeerClient,
    pub config: NodeConfig,
}

impl NodeState {
    pub fn new(config: NodeConfig) -> Result<Self> {
        Ok(Self {
            blockchain: Mutex::new(Blockchain::new(config.difficulty)),
            peers: Mutex::new(PeerRegistry::new()),
            chain_epoch: AtomicU64::new(0),
            client: PeerClient::new(config.peer_timeout)?,
            config,
        })
    }

    pub fn difficulty(&self) -> u32 {
        self.config.difficulty
    }

    pub fn chain_epoch(&self) -> u64 {
        self.chain_epoch.load(Ordering::SeqCst)
    }

    pub fn chain_len(&self) -> usize {
        self.blockchain.lock().expect("mutex poisoned").len()
    }

    /// Consistent copy of the chain plus the current peer set.
    pub fn chain_snapshot(&self) -> ChainResponse {
        let bc = self.blockchain.lock().expect("mutex poisoned");
        let chain = bc.chain().to_vec();
        let peers = self.peers.lock().expect("mutex poisoned").to_vec();
        drop(bc);
        ChainResponse {
            length: chain.len(),
            chain,
            peers,
        }
    }

    /// Swap in a whole new ledger. The previous one, pending pool included,
    /// is dropped.
    pub fn replace_ledger(&self, ledger: Blockchain) {
        let mut bc = self.blockchain.lock().expect("mutex poisoned");
        *bc = ledger;
        self.chain_epoch.fetch_add(1, Ordering::SeqCst);
    }

    /// Swap in a whole new ledger and update the peer set in the same
    /// critical section, so no snapshot mixes the old chain with new peers.
    pub fn replace_ledger_and_peers<F>(&self, ledger: Blockchain, update_peers: F)
    where
        F: FnOnce(&mut PeerRegistry),
    {
        let mut bc = self.blockchain.lock().expect("mutex poisoned");
        let mut peers = self.peers.lock().expect("mutex poisoned");
        *bc = ledger;
        update_peers(&mut peers);
        self.chain_epoch.fetch_add(1, Ordering::SeqCst);
    }

    /// Swap in `ledger` only if it is still strictly longer than the local
    /// chain at the moment of the swap.
    pub fn replace_ledger_if_longer(&self, ledger: Blockchain) -> bool {
        let mut bc = self.blockchain.lock().expect("mutex poisoned");
        if ledger.len() <= bc.len() {
            return false;
        }
        *bc = ledger;
        self.chain_epoch.fetch_add(1, Ordering::SeqCst);
        true
    }
}

/// Mine the whole pending pool into one block.
///
/// The batch is drained under the lock, the nonce search runs on the blocking
/// pool, and the sealed block is admitted through `add_block`. If the ledger
/// is replaced meanwhile the search is abandoned and the batch goes back to
/// the front of the pending pool.
pub async fn mine_pending(state: web::Data<NodeState>) -> Result<Option<Block>> {
    let (mut block, epoch) = {
        let mut bc = state.blockchain.lock().expect("mutex poisoned");
        match bc.take_pending_block() {
            Some(block) => (block, state.chain_epoch()),
            None => return Ok(None),
        }
    };
    let difficulty = state.difficulty();
    let batch = block.transactions.clone();

    let worker = state.clone();
    let (block, proof) = web::block(move || {
        let proof = proof_of_work_until(&mut block, difficulty, || worker.chain_epoch() != epoch);
        (block, proof)
    })
    .await?;

    let mut bc = state.blockchain.lock().expect("mutex poisoned");
    let Some(proof) = proof else {
        info!("mining of block #{} interrupted by a chain swap", block.index);
        bc.requeue(batch);
        return Err(NodeError::MiningInterrupted);
    };

    let index = block.index;
    match bc.add_block(block, &proof) {
        Ok(()) => {
            info!("MINER - sealed block #{index} (hash={proof})");
            Ok(Some(bc.last_block().clone()))
        }
        Err(e) => {
            warn!("MINER - block #{index} no longer fits the chain: {e}");
            bc.requeue(batch);
            Err(NodeError::MiningInterrupted)
        }
    }
}
