use super::Block;

/// How many nonces are tried between two checks of the stop condition.
const STOP_POLL_INTERVAL: u64 = 1024;

/// True if `hash` starts with `difficulty` zero hex digits.
pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
    let difficulty = difficulty as usize;
    hash.len() >= difficulty && hash.bytes().take(difficulty).all(|c| c == b'0')
}

/// Brute-force a nonce for `block`, starting from zero, until its digest has
/// `difficulty` leading zero hex digits. Returns the winning hash; `block.nonce`
/// is left at the winning value and `block.hash` is not touched.
pub fn proof_of_work(block: &mut Block, difficulty: u32) -> String {
    // never asked to stop, so the search only ends on success
    proof_of_work_until(block, difficulty, || false).unwrap_or_default()
}

/// Same search as [`proof_of_work`], but `should_stop` is polled periodically
/// and `None` is returned once it reports true.
pub fn proof_of_work_until<F>(block: &mut Block, difficulty: u32, should_stop: F) -> Option<String>
where
    F: Fn() -> bool,
{
    block.nonce = 0;
    loop {
        let hash = block.compute_hash();
        if meets_difficulty(&hash, difficulty) {
            return Some(hash);
        }
        block.nonce = block.nonce.wrapping_add(1);
        if block.nonce % STOP_POLL_INTERVAL == 0 && should_stop() {
            return None;
        }
    }
}

/// A proof is valid when it meets the difficulty and equals a fresh digest of
/// the block's current fields.
pub fn is_proof_valid(block: &Block, claimed_hash: &str, difficulty: u32) -> bool {
    meets_difficulty(claimed_hash, difficulty) && claimed_hash == block.compute_hash()
}
