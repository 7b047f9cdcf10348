//! In-memory `BlockInfoStore` test double, shared by unit tests in this crate
//! and by the integration tests under `tests/`.
//!
//! Grounded on the teacher's unconditional `pub mod test_helpers` (not
//! `#[cfg(test)]`-gated): a public module so both the `#[cfg(test)]` unit tests
//! colocated in other files and the external `tests/` directory can reach it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::block_info::{BlockInfo, BlockInfoStore};
use crate::hash::{BlockHash, BlockHeight};

/// A fixed `BlockInfo` implementation built from a human-readable seed string
/// hashed into a [`BlockHash`], so test scenarios can write `TestBlockInfo::new("b1", 2, vec![...])`
/// instead of spelling out 64 hex characters by hand.
#[derive(Clone, Debug)]
pub struct TestBlockInfo {
    hash: BlockHash,
    height: BlockHeight,
    parents: Vec<BlockHash>,
    bad: bool,
    final_: bool,
}

impl TestBlockInfo {
    pub fn new(seed: &str, height: BlockHeight, parents: Vec<BlockHash>) -> Self {
        Self { hash: seed_hash(seed), height, parents, bad: false, final_: false }
    }

    pub fn genesis() -> Self {
        Self { hash: BlockHash::genesis_sentinel(), height: 0, parents: Vec::new(), bad: false, final_: true }
    }

    pub fn bad(mut self) -> Self {
        self.bad = true;
        self
    }

    pub fn finalized(mut self) -> Self {
        self.final_ = true;
        self
    }
}

impl BlockInfo for TestBlockInfo {
    fn hash(&self) -> BlockHash {
        self.hash
    }

    fn height(&self) -> BlockHeight {
        self.height
    }

    fn parent_hashes(&self) -> &[BlockHash] {
        &self.parents
    }

    fn is_bad(&self) -> bool {
        self.bad
    }

    fn is_final(&self) -> bool {
        self.final_
    }

    fn concilium_id(&self) -> u64 {
        0
    }
}

/// Deterministically derives a [`BlockHash`] from a short seed, for readable
/// test fixtures. Not a cryptographic hash -- collisions are the caller's
/// problem if they pick colliding seeds, same as in the teacher's
/// `header_from_precomputed_hash` helpers.
pub fn seed_hash(seed: &str) -> BlockHash {
    let mut bytes = [0u8; BlockHash::SIZE];
    let seed_bytes = seed.as_bytes();
    for (i, b) in bytes.iter_mut().enumerate() {
        *b = seed_bytes.get(i % seed_bytes.len().max(1)).copied().unwrap_or(0).wrapping_add(i as u8);
    }
    BlockHash::from_bytes(bytes)
}

/// A `BlockInfoStore` backed by a plain `HashMap`, for exercising [`crate::index::DagIndex`]
/// without a real node's block store.
#[derive(Clone, Default)]
pub struct InMemoryBlockInfoStore {
    inner: Arc<Mutex<HashMap<BlockHash, TestBlockInfo>>>,
}

impl InMemoryBlockInfoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, info: TestBlockInfo) {
        self.inner.lock().unwrap().insert(info.hash(), info);
    }
}

impl BlockInfoStore for InMemoryBlockInfoStore {
    type Info = TestBlockInfo;

    fn get_block_info(&self, hash: BlockHash) -> Option<Self::Info> {
        self.inner.lock().unwrap().get(&hash).cloned()
    }

    fn has_block(&self, hash: BlockHash) -> bool {
        self.inner.lock().unwrap().contains_key(&hash)
    }

    fn save_block_info(&self, info: Self::Info) {
        self.insert(info);
    }

    fn last_applied_block_hashes(&self) -> Vec<BlockHash> {
        self.inner.lock().unwrap().values().filter(|i| i.is_final()).map(|i| i.hash()).collect()
    }

    fn pending_block_hashes(&self) -> Vec<BlockHash> {
        self.inner.lock().unwrap().values().filter(|i| !i.is_final()).map(|i| i.hash()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_seeds_give_distinct_hashes() {
        assert_ne!(seed_hash("a"), seed_hash("b"));
    }

    #[test]
    fn store_round_trips_inserted_info() {
        let store = InMemoryBlockInfoStore::new();
        let info = TestBlockInfo::new("x", 5, vec![]);
        store.insert(info.clone());
        let fetched = store.get_block_info(info.hash()).unwrap();
        assert_eq!(fetched.height(), 5);
    }
}
