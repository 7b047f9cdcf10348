use std::collections::HashMap;
use std::sync::Arc;

use dagindex_kvstore::KvStore;

use crate::backend::Backend;
use crate::block_info::{BlockInfo, BlockInfoStore};
use crate::cache::PageCache;
use crate::config::DagIndexConfig;
use crate::error::DagIndexResult;
use crate::hash::{BlockHash, BlockHeight};
use crate::page::{PageEntry, PageIndex, PageRecord};

/// The authoritative public index interface (§4.4).
///
/// Owns the [`PageCache`] and the dag-prefix; every operation here runs against a
/// stable read of cache + Backend while the relevant named locks are held by the
/// Backend calls it makes. `S` is the externally supplied `BlockInfoStore`
/// capability (§6); the index never constructs or validates a `BlockInfo` itself.
pub struct DagIndex<S: BlockInfoStore> {
    block_store: S,
    backend: Backend,
    cache: PageCache,
    config: DagIndexConfig,
}

impl<S: BlockInfoStore> DagIndex<S> {
    pub fn new(kv: Arc<KvStore>, dag_prefix: String, config: DagIndexConfig, block_store: S) -> Self {
        let cache = PageCache::new(config.pages_in_memory);
        Self { block_store, backend: Backend::new(kv, dag_prefix), cache, config }
    }

    pub fn config(&self) -> &DagIndexConfig {
        &self.config
    }

    /// The `BlockInfoStore` this index was constructed with, for callers that
    /// need to walk parent pointers alongside the index itself (the Descendant
    /// Walker's recovery branch, startup reconstruction).
    pub fn block_store(&self) -> &S {
        &self.block_store
    }

    fn load_page(&self, page_index: PageIndex) -> DagIndexResult<PageRecord> {
        if let Some(record) = self.cache.lookup(page_index) {
            return Ok(record);
        }
        let record = self.backend.get_page(page_index)?.unwrap_or_default();
        self.cache.insert(page_index, record.clone());
        Ok(record)
    }

    /// Writes `record` through to the Backend and the cache within the same
    /// logical step, honouring I6.
    fn flush_page(&self, page_index: PageIndex, record: &PageRecord, order_delta: i64) -> DagIndexResult<()> {
        self.backend.commit(page_index, record, order_delta)?;
        self.cache.insert(page_index, record.clone());
        Ok(())
    }

    /// `addBlock(blockInfo)` (§4.4).
    ///
    /// Idempotent (P1): re-adding the same block leaves every page entry and the
    /// order counter unchanged, because each mutation path only bumps the order
    /// counter on the branch that *creates* an entry, and promoting an
    /// already-processed entry or re-inserting an identical child mapping is a
    /// no-op on the underlying `HashMap`.
    pub fn add_block(&self, info: &S::Info) -> DagIndexResult<()> {
        let hash = info.hash();
        let height = info.height();

        if hash != self.config.genesis_hash {
            for &parent in info.parent_hashes() {
                let Some(parent_info) = self.block_store.get_block_info(parent) else {
                    // Parent not yet stored: legitimate during reorgs, recovered silently (§7).
                    continue;
                };
                let parent_height = parent_info.height();
                if height.checked_sub(parent_height) != Some(1) {
                    // Gap edge: not indexed (I3).
                    continue;
                }

                let parent_page_index = self.config.page_index(parent_height);
                let mut page = self.load_page(parent_page_index)?;
                let order_delta = match page.get_mut(&parent) {
                    None => {
                        let mut entry = PageEntry::placeholder();
                        entry.1.insert(hash, height);
                        page.insert(parent, entry);
                        1
                    }
                    Some(entry) => {
                        entry.1.insert(hash, height);
                        0
                    }
                };
                self.flush_page(parent_page_index, &page, order_delta)?;
            }
        }

        let page_index = self.config.page_index(height);
        let mut page = self.load_page(page_index)?;
        let order_delta = match page.get_mut(&hash) {
            None => {
                page.insert(hash, PageEntry(true, HashMap::new()));
                1
            }
            Some(entry) if !entry.processed() => {
                entry.promote();
                0
            }
            Some(_) => 0,
        };
        self.flush_page(page_index, &page, order_delta)?;
        Ok(())
    }

    /// `removeBlock(blockInfo)` (§4.4).
    pub fn remove_block(&self, info: &S::Info) -> DagIndexResult<()> {
        let hash = info.hash();
        let height = info.height();
        let page_index = self.config.page_index(height);

        if let Some(mut page) = self.read_page_if_present(page_index)? {
            if page.remove(&hash).is_some() {
                self.flush_page(page_index, &page, -1)?;
            }
        }

        for &parent in info.parent_hashes() {
            let Some(parent_info) = self.block_store.get_block_info(parent) else {
                continue;
            };
            let parent_page_index = self.config.page_index(parent_info.height());
            let Some(mut parent_page) = self.read_page_if_present(parent_page_index)? else {
                continue;
            };

            let Some(entry) = parent_page.get_mut(&parent) else {
                continue;
            };
            if entry.1.remove(&hash).is_none() {
                continue;
            }

            if entry.1.is_empty() && !entry.processed() {
                parent_page.remove(&parent);
                self.flush_page(parent_page_index, &parent_page, -1)?;
            } else {
                self.flush_page(parent_page_index, &parent_page, 0)?;
            }
        }

        Ok(())
    }

    /// Returns the page for `page_index` only if it (or the Backend's copy of it)
    /// actually exists, distinguishing "no page yet" from "empty page" the way
    /// `removeBlock`'s "If missing, return/skip" steps require.
    fn read_page_if_present(&self, page_index: PageIndex) -> DagIndexResult<Option<PageRecord>> {
        if let Some(record) = self.cache.lookup(page_index) {
            return Ok(Some(record));
        }
        self.backend.get_page(page_index)
    }

    /// `has(hash, height?)` (§4.4). A read failure anywhere in the chain is a
    /// conservative `false`, never a crash (§7).
    pub fn has(&self, hash: BlockHash, height: Option<BlockHeight>) -> bool {
        let Some(height) = height.or_else(|| self.block_store.get_block_info(hash).map(|i| i.height())) else {
            return false;
        };
        self.is_processed_at(hash, height)
    }

    fn is_processed_at(&self, hash: BlockHash, height: BlockHeight) -> bool {
        let page_index = self.config.page_index(height);
        match self.load_page(page_index) {
            Ok(page) => page.get(&hash).map(PageEntry::processed).unwrap_or(false),
            Err(e) => {
                log::debug!("page load failed while checking {hash}: {e}");
                false
            }
        }
    }

    /// `getBlockHeight(hash) -> height | null` (§4.4).
    pub fn get_block_height(&self, hash: BlockHash) -> Option<BlockHeight> {
        let info = self.block_store.get_block_info(hash)?;
        let height = info.height();
        self.is_processed_at(hash, height).then_some(height)
    }

    /// `getBlockInfo(hash) -> BlockInfo | null` (§4.4).
    pub fn get_block_info(&self, hash: BlockHash) -> Option<S::Info> {
        let info = self.block_store.get_block_info(hash)?;
        let height = info.height();
        self.is_processed_at(hash, height).then_some(info)
    }

    /// `getChildren(hash, height) -> { BlockHash -> BlockHeight }` (§4.4).
    pub fn get_children(&self, hash: BlockHash, height: BlockHeight) -> HashMap<BlockHash, BlockHeight> {
        let page_index = self.config.page_index(height);
        match self.load_page(page_index) {
            Ok(page) => page.get(&hash).filter(|e| e.processed()).map(|e| e.children().clone()).unwrap_or_default(),
            Err(e) => {
                log::debug!("page load failed while reading children of {hash}: {e}");
                HashMap::new()
            }
        }
    }

    /// `getOrder() -> integer` (§4.4).
    pub fn get_order(&self) -> u64 {
        self.backend.get_order()
    }

    /// Convenience parent lookup, delegating to the `BlockInfoStore` rather than
    /// the page index: the index stores children, not parents (§1 Non-goals), so
    /// "parents of a block" is always the externally supplied data, never a page
    /// lookup (SPEC_FULL "Parent/child symmetry helper").
    pub fn parents(&self, hash: BlockHash) -> Option<Vec<BlockHash>> {
        self.block_store.get_block_info(hash).map(|info| info.parent_hashes().to_vec())
    }

    /// Number of distinct pages the Backend currently holds, for tests and
    /// operational introspection only (SPEC_FULL "Counts for test/ops visibility").
    pub fn page_count(&self) -> DagIndexResult<usize> {
        Ok(self.backend.page_keys()?.len())
    }
}
