use crate::block_info::{BlockInfo, BlockInfoStore};
use crate::error::{DagIndexError, DagIndexResult};
use crate::hash::BlockHash;
use crate::index::DagIndex;

/// `rebuild(stableHashes, pendingHashes)` (§4.6): re-hydrates a fresh `DagIndex`
/// from persisted `BlockInfo` records by walking parent pointers toward genesis.
///
/// `index` must already be a freshly constructed, empty `DagIndex` (a new
/// dag-prefix): this function is the only writer of historical edges, mirroring
/// the teacher's distinction between `consensus`'s one-time `reindex` passes and
/// its steady-state, incrementally-maintained stores.
pub fn rebuild<S: BlockInfoStore>(
    index: &DagIndex<S>,
    stable_hashes: &[BlockHash],
    pending_hashes: &[BlockHash],
) -> DagIndexResult<()> {
    let mut frontier: Vec<BlockHash> =
        if pending_hashes.is_empty() { stable_hashes.to_vec() } else { pending_hashes.to_vec() };

    // Genesis has no parents, so once it's the sole frontier entry, processing it
    // below pushes nothing onto `next_frontier` and the loop terminates naturally
    // on the following iteration. It must still be processed here -- otherwise it
    // is only ever written as a back-pointer placeholder by whatever names it as a
    // parent and never promoted to `processed = true` (§4.4).
    while !frontier.is_empty() {
        let mut next_frontier = Vec::new();

        for hash in frontier {
            let info = index
                .block_store()
                .get_block_info(hash)
                .ok_or(DagIndexError::InvariantViolation(hash, "missing BlockInfo during rebuild"))?;
            if info.is_bad() {
                return Err(DagIndexError::InvariantViolation(hash, "bad BlockInfo during rebuild"));
            }

            index.add_block(&info)?;

            for &parent in info.parent_hashes() {
                if index.get_block_height(parent).is_none() {
                    next_frontier.push(parent);
                }
            }
        }

        frontier = next_frontier;
    }

    Ok(())
}
