use std::collections::{HashMap, HashSet};

use crate::block_info::BlockInfoStore;
use crate::error::DagIndexResult;
use crate::hash::{BlockHash, BlockHeight};
use crate::index::DagIndex;

/// `blocksFromLastKnown` (§4.5): breadth-first over direct-child edges, starting
/// from the heights of `last_known` and stopping once the result set passes
/// `max_blocks_inv`.
///
/// Grounded on the level-by-level `VecDeque` BFS in the teacher's
/// `reachability::reindex` traversal, adapted to a `HashMap` frontier because
/// each node here carries its height alongside its hash.
pub fn blocks_from_last_known<S: BlockInfoStore>(index: &DagIndex<S>, last_known: &[BlockHash]) -> HashSet<BlockHash> {
    let mut known: HashMap<BlockHash, BlockHeight> = HashMap::new();
    for &hash in last_known {
        if let Some(height) = index.get_block_height(hash) {
            known.insert(hash, height);
        }
    }

    let mut result: HashSet<BlockHash> = HashSet::new();

    if known.is_empty() {
        // Peer's hashes are all unknown to us: treat it as on a divergent DAG
        // and seed from genesis instead (§4.5 step 2).
        let genesis = index.config().genesis_hash;
        match index.get_block_height(genesis) {
            Some(height) => {
                known.insert(genesis, height);
                result.insert(genesis);
            }
            None => return result,
        }
    }

    let mut frontier = known.clone();
    while !frontier.is_empty() && result.len() <= index.config().max_blocks_inv {
        let mut next_frontier: HashMap<BlockHash, BlockHeight> = HashMap::new();
        for (&hash, &height) in frontier.iter() {
            for (&child, &child_height) in index.get_children(hash, height).iter() {
                if !known.contains_key(&child) && !result.contains(&child) {
                    next_frontier.insert(child, child_height);
                }
            }
            if !known.contains_key(&hash) && !result.contains(&hash) {
                result.insert(hash);
            }
        }
        frontier = next_frontier;
    }

    result
}

/// Wire-facing entry point for the peer-sync handler (§2: "Used by peer sync"):
/// parses each hex hash out of an inbound message before running the walk,
/// rejecting a malformed hash at this boundary rather than letting garbage reach
/// `DagIndex` (§7 InputError).
pub fn blocks_from_last_known_hex<S: BlockInfoStore>(
    index: &DagIndex<S>,
    last_known_hex: &[impl AsRef<str>],
) -> DagIndexResult<HashSet<BlockHash>> {
    let last_known =
        last_known_hex.iter().map(|s| BlockHash::parse_hex(s.as_ref())).collect::<DagIndexResult<Vec<_>>>()?;
    Ok(blocks_from_last_known(index, &last_known))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use dagindex_kvstore::KvStore;

    use super::*;
    use crate::config::DagIndexConfig;
    use crate::testutil::{InMemoryBlockInfoStore, TestBlockInfo};

    fn new_index(store: InMemoryBlockInfoStore, config: DagIndexConfig) -> (tempfile::TempDir, DagIndex<InMemoryBlockInfoStore>) {
        let dir = tempfile::tempdir().unwrap();
        let kv = Arc::new(KvStore::open(dir.path()).unwrap());
        (dir, DagIndex::new(kv, "gen0".to_string(), config, store))
    }

    fn linear_chain(len: u64) -> (InMemoryBlockInfoStore, Vec<TestBlockInfo>) {
        let store = InMemoryBlockInfoStore::new();
        let mut blocks = vec![TestBlockInfo::genesis()];
        for height in 1..=len {
            let parent = blocks.last().unwrap().hash();
            blocks.push(TestBlockInfo::new(&format!("b{height}"), height, vec![parent]));
        }
        for block in &blocks {
            store.insert(block.clone());
        }
        (store, blocks)
    }

    #[test]
    fn peer_behind_returns_only_later_blocks() {
        let (store, blocks) = linear_chain(50);
        let config = DagIndexConfig { step: 4, max_blocks_inv: 500, ..Default::default() };
        let (_dir, index) = new_index(store, config);
        for block in &blocks {
            index.add_block(block).unwrap();
        }

        let result = blocks_from_last_known(&index, &[blocks[10].hash()]);
        assert!(!result.contains(&blocks[10].hash()));
        assert!(result.contains(&blocks[11].hash()));
        assert!(result.contains(&blocks[50].hash()));
        assert_eq!(result.len(), 40);
    }

    #[test]
    fn peer_on_divergent_dag_recovers_from_genesis() {
        let (store, blocks) = linear_chain(5);
        let config = DagIndexConfig { step: 4, max_blocks_inv: 500, ..Default::default() };
        let (_dir, index) = new_index(store, config);
        for block in &blocks {
            index.add_block(block).unwrap();
        }

        let unknown = TestBlockInfo::new("not-in-our-dag", 7, vec![]).hash();
        let result = blocks_from_last_known(&index, &[unknown]);
        assert!(result.contains(&blocks[0].hash()));
        for block in &blocks[1..] {
            assert!(result.contains(&block.hash()));
        }
    }

    #[test]
    fn unknown_and_no_genesis_returns_empty() {
        let store = InMemoryBlockInfoStore::new();
        let config = DagIndexConfig { step: 4, ..Default::default() };
        let (_dir, index) = new_index(store, config);

        let unknown = TestBlockInfo::new("nowhere", 1, vec![]).hash();
        let result = blocks_from_last_known(&index, &[unknown]);
        assert!(result.is_empty());
    }

    #[test]
    fn respects_response_cap() {
        let (store, blocks) = linear_chain(30);
        let config = DagIndexConfig { step: 4, max_blocks_inv: 5, ..Default::default() };
        let (_dir, index) = new_index(store, config);
        for block in &blocks {
            index.add_block(block).unwrap();
        }

        let result = blocks_from_last_known(&index, &[blocks[0].hash()]);
        // Soft cap: the loop may overshoot by one level's worth (§4.5), but
        // must not run away to the full 30-block chain.
        assert!(result.len() < blocks.len());
    }

    #[test]
    fn hex_entry_point_rejects_malformed_hash() {
        let (store, blocks) = linear_chain(2);
        let config = DagIndexConfig { step: 4, ..Default::default() };
        let (_dir, index) = new_index(store, config);
        for block in &blocks {
            index.add_block(block).unwrap();
        }

        assert!(blocks_from_last_known_hex(&index, &["not-hex"]).is_err());

        let hex = blocks[0].hash().to_string();
        let result = blocks_from_last_known_hex(&index, &[hex]).unwrap();
        assert!(result.contains(&blocks[1].hash()));
    }
}
