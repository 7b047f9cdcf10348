use std::time::Instant;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::page::{PageIndex, PageRecord};

/// Bounded in-memory page cache with LRU-by-last-access eviction (§4.3, I5).
///
/// Grounded on the teacher's `kaspa_database::cache::Cache`, which keeps an
/// `IndexMap` under a `parking_lot::RwLock` for the same reason: cheap removal of
/// an arbitrary entry. Where the teacher evicts a *uniformly random* entry when
/// full (a documented source bug, §9 "Cache LRU comparator"), this cache tracks an
/// actual `lastAccess` timestamp per entry and evicts the oldest one, as the spec
/// prescribes: "sort by ascending lastAccess, drop the oldest until within
/// capacity".
pub struct PageCache {
    inner: RwLock<IndexMap<PageIndex, Entry>>,
    capacity: usize,
}

struct Entry {
    last_access: Instant,
    record: PageRecord,
}

impl PageCache {
    pub fn new(capacity: usize) -> Self {
        Self { inner: RwLock::new(IndexMap::with_capacity(capacity)), capacity }
    }

    /// Returns a clone of the cached page, bumping its `lastAccess`, or `None` on
    /// a miss. A miss is not evidence the page doesn't exist -- the caller falls
    /// back to the Backend.
    pub fn lookup(&self, page_index: PageIndex) -> Option<PageRecord> {
        let mut guard = self.inner.write();
        let entry = guard.get_mut(&page_index)?;
        entry.last_access = Instant::now();
        Some(entry.record.clone())
    }

    /// Inserts or overwrites `record` for `page_index`, evicting the
    /// least-recently-accessed entries first if the cache is at capacity (I5).
    pub fn insert(&self, page_index: PageIndex, record: PageRecord) {
        if self.capacity == 0 {
            return;
        }
        let mut guard = self.inner.write();
        if !guard.contains_key(&page_index) {
            while guard.len() >= self.capacity {
                let Some((oldest_key, _)) = guard.iter().min_by_key(|(_, e)| e.last_access).map(|(k, _)| (*k, ())) else {
                    break;
                };
                guard.swap_remove(&oldest_key);
            }
        }
        guard.insert(page_index, Entry { last_access: Instant::now(), record });
    }

    /// Removes a page from the cache without touching the Backend. Used only on
    /// re-index (§4.3 `invalidate`).
    pub fn invalidate(&self, page_index: PageIndex) {
        self.inner.write().swap_remove(&page_index);
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
