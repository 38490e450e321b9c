use log::{debug, warn};

use super::Block;
use super::pow::{is_proof_valid, proof_of_work};
use crate::error::{NodeError, Result};
use crate::transaction::Transaction;

/// In-memory ledger: the block chain plus the pool of pending transactions.
#[derive(Debug, Clone)]
pub struct Blockchain {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
    difficulty: u32,
}

impl Blockchain {
    /// Initialize a new ledger holding only the genesis block.
    pub fn new(difficulty: u32) -> Self {
        Self {
            chain: vec![Block::genesis()],
            pending: Vec::new(),
            difficulty,
        }
    }

    /// Rebuild a ledger from a peer's chain dump, re-validating every block
    /// through [`Blockchain::add_block`]. The first failure aborts the whole
    /// reconstruction and nothing is returned.
    pub fn from_dump(dump: Vec<Block>, difficulty: u32) -> Result<Self> {
        let mut ledger = Self::new(difficulty);
        let mut blocks = dump.into_iter();

        match blocks.next() {
            Some(genesis) if is_canonical_genesis(&genesis) => {}
            _ => return Err(NodeError::TamperedChainDump { index: 0 }),
        }

        for block in blocks {
            let index = block.index;
            let proof = block.hash.clone().unwrap_or_default();
            if let Err(e) = ledger.add_block(block, &proof) {
                warn!("chain dump rejected at block #{index}: {e}");
                return Err(NodeError::TamperedChainDump { index });
            }
        }
        Ok(ledger)
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("Blockchain should always have at least the genesis block")
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Queue a transaction for the next block. No validation, no deduplication.
    pub fn add_new_transaction(&mut self, tx: Transaction) {
        self.pending.push(tx);
    }

    /// Drain the whole pending pool into an unmined block on top of the
    /// current tip. `None` when there is nothing to mine.
    pub fn take_pending_block(&mut self) -> Option<Block> {
        if self.pending.is_empty() {
            return None;
        }
        let last = self.last_block();
        let index = last.index + 1;
        let pred_hash = last.hash_str().to_string();
        let batch = std::mem::take(&mut self.pending);
        Some(Block::new(index, pred_hash, batch))
    }

    /// Put a batch back at the front of the pending pool, ahead of anything
    /// submitted since it was drained.
    pub fn requeue(&mut self, mut batch: Vec<Transaction>) {
        batch.append(&mut self.pending);
        self.pending = batch;
    }

    /// Mine the entire pending pool into exactly one new block.
    /// `Ok(None)` when the pool is empty.
    pub fn mine(&mut self) -> Result<Option<u64>> {
        let Some(mut block) = self.take_pending_block() else {
            return Ok(None);
        };
        let proof = proof_of_work(&mut block, self.difficulty);
        let index = block.index;
        let batch = block.transactions.clone();
        match self.add_block(block, &proof) {
            Ok(()) => Ok(Some(index)),
            Err(e) => {
                self.requeue(batch);
                Err(e)
            }
        }
    }

    /// Append a block after checking it links to the tip and that `proof`
    /// is a valid proof of work for it. The chain is untouched on failure.
    pub fn add_block(&mut self, mut block: Block, proof: &str) -> Result<()> {
        if block.pred_hash != self.last_block().hash_str() {
            return Err(NodeError::ChainLinkMismatch { index: block.index });
        }
        if !is_proof_valid(&block, proof, self.difficulty) {
            return Err(NodeError::ProofInvalid { index: block.index });
        }
        block.hash = Some(proof.to_string());
        debug!("block #{} appended (hash={})", block.index, proof);
        self.chain.push(block);
        Ok(())
    }

    /// Walk a whole chain checking genesis, hash linkage and every proof.
    /// Each block's proof is checked against the hash it carries, with the
    /// digest recomputed over its other fields.
    pub fn validate_chain(chain: &[Block], difficulty: u32) -> Result<()> {
        match chain.first() {
            Some(genesis) if is_canonical_genesis(genesis) => {}
            _ => return Err(NodeError::ProofInvalid { index: 0 }),
        }

        for pair in chain.windows(2) {
            let (prev, current) = (&pair[0], &pair[1]);
            if current.pred_hash != prev.hash_str() {
                return Err(NodeError::ChainLinkMismatch {
                    index: current.index,
                });
            }
            if !is_proof_valid(current, current.hash_str(), difficulty) {
                return Err(NodeError::ProofInvalid {
                    index: current.index,
                });
            }
        }
        Ok(())
    }

    pub fn is_chain_valid(chain: &[Block], difficulty: u32) -> bool {
        Self::validate_chain(chain, difficulty).is_ok()
    }
}

/// Genesis is exempt from the difficulty rule but must be the fixed block.
fn is_canonical_genesis(block: &Block) -> bool {
    let canonical = Block::genesis();
    block.hash == canonical.hash && block.compute_hash() == canonical.hash_str()
}
