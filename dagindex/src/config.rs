use crate::hash::BlockHash;

/// Recognised configuration constants (§6).
///
/// Held as an instance passed by reference into [`crate::backend::Backend`] and
/// [`crate::index::DagIndex`] -- never module-scope global state, per the §9
/// guidance to prefer the instance-owned cache/config form so multiple index
/// instances (and hot re-index) stay independent.
#[derive(Clone, Debug)]
pub struct DagIndexConfig {
    /// `MAIN_DAG_INDEX_STEP`: paging stride. Pages cover `step` consecutive heights.
    pub step: u64,
    /// `MAIN_DAG_PAGES_IN_MEMORY`: page-cache capacity.
    pub pages_in_memory: usize,
    /// `MAX_BLOCKS_INV`: descendant walker response cap.
    pub max_blocks_inv: usize,
    /// `GENESIS_BLOCK`: sentinel hash of the DAG root.
    pub genesis_hash: BlockHash,
    /// `DB_MAIN_DAG_INDEX_DIR`: subdirectory name of the index store under the
    /// node's data path.
    pub db_dir: &'static str,
}

impl Default for DagIndexConfig {
    fn default() -> Self {
        Self {
            step: 100,
            pages_in_memory: 10,
            max_blocks_inv: 500,
            genesis_hash: BlockHash::genesis_sentinel(),
            db_dir: "main-dag-index",
        }
    }
}

impl DagIndexConfig {
    /// `pageIndex(h) = floor(h / STEP) * (STEP - 1)` (§3). Implementers MUST
    /// reproduce this exact formula: it is baked into persisted page keys, and
    /// deliberately does not produce contiguous, non-overlapping buckets (§9).
    pub fn page_index(&self, height: u64) -> u64 {
        (height / self.step) * (self.step - 1)
    }
}
