use std::str::FromStr;
use std::sync::Arc;

use dagindex_kvstore::{BatchWriter, DbWriter, KvStore};
use rocksdb::WriteBatch;

use crate::error::{DagIndexError, DagIndexResult};
use crate::lock::KeyedMutex;
use crate::page::{order_key, page_key, PageIndex, PageRecord};

const LOCK_PAGE: &str = "dagIndexPage";
const LOCK_ORDER: &str = "dagIndexOrder";

/// The Index Backend (§4.2): two logical namespaces over the KV store, each
/// guarded by its own named lock, with JSON/decimal (de)serialisation.
///
/// `"dagIndexPage"` guards every page read/write; `"dagIndexOrder"` guards the
/// order counter. A composite mutation that touches both (every `addBlock` step
/// that creates or removes an entry) goes through [`Backend::commit`], which
/// takes both locks in one critical section and applies both writes as a single
/// RocksDB batch -- the concrete form of I6 ("write-through... within the same
/// critical section").
pub struct Backend {
    store: Arc<KvStore>,
    dag_prefix: String,
    locks: KeyedMutex,
}

impl Backend {
    pub fn new(store: Arc<KvStore>, dag_prefix: String) -> Self {
        Self { store, dag_prefix, locks: KeyedMutex::new() }
    }

    pub fn dag_prefix(&self) -> &str {
        &self.dag_prefix
    }

    /// `getPage(pageKey) -> PageRecord | null` (§4.2). KV-layer read failures are
    /// downgraded to "absent" and debug-logged (§4.2, §7); a malformed stored
    /// record is a genuine data-integrity problem and propagates.
    pub fn get_page(&self, page_index: PageIndex) -> DagIndexResult<Option<PageRecord>> {
        let _guard = self.locks.acquire(&[LOCK_PAGE]);
        match self.store.get(page_key(&self.dag_prefix, page_index)) {
            Ok(Some(bytes)) => {
                let record: PageRecord = serde_json::from_slice(&bytes)?;
                Ok(Some(record))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                log::debug!("page read failed for {}_{page_index}: {e}, treating as absent", self.dag_prefix);
                Ok(None)
            }
        }
    }

    /// `getOrder(dagPrefix) -> integer`, 0 if absent (§4.2).
    pub fn get_order(&self) -> u64 {
        let _guard = self.locks.acquire(&[LOCK_ORDER]);
        self.get_order_locked()
    }

    fn get_order_locked(&self) -> u64 {
        match self.store.get(order_key(&self.dag_prefix)) {
            Ok(Some(bytes)) => std::str::from_utf8(&bytes).ok().and_then(|s| u64::from_str(s).ok()).unwrap_or(0),
            Ok(None) => 0,
            Err(e) => {
                log::debug!("order read failed for {}: {e}, treating as 0", self.dag_prefix);
                0
            }
        }
    }

    /// Writes `record` for `page_index` and applies `order_delta` to the order
    /// counter as a single atomic RocksDB batch, under both named locks (§4.2,
    /// §4.4, I6). `order_delta` is commonly `0`, `1` (new processed/placeholder
    /// entry), or `-1` (entry removed).
    pub fn commit(&self, page_index: PageIndex, record: &PageRecord, order_delta: i64) -> DagIndexResult<()> {
        let _guard = self.locks.acquire(&[LOCK_PAGE, LOCK_ORDER]);

        let mut batch = WriteBatch::default();
        let mut writer = BatchWriter::new(&mut batch);
        let page_bytes = serde_json::to_vec(record).map_err(DagIndexError::Corrupt)?;
        writer.put(&page_key(&self.dag_prefix, page_index), &page_bytes)?;

        if order_delta != 0 {
            let current = self.get_order_locked() as i64;
            let next = (current + order_delta).max(0) as u64;
            writer.put(&order_key(&self.dag_prefix), next.to_string().as_bytes())?;
        }

        self.store.write_batch(batch).map_err(DagIndexError::from)
    }

    /// Lists every page key currently stored under this prefix, for tests and
    /// operational introspection only (SPEC_FULL "Counts for test/ops visibility").
    /// Not used by any hot-path index operation.
    pub fn page_keys(&self) -> DagIndexResult<Vec<PageIndex>> {
        let _guard = self.locks.acquire(&[LOCK_PAGE]);
        let prefix = format!("{}_", self.dag_prefix);
        let order_key_str = format!("{}_order", self.dag_prefix);
        let mut out = Vec::new();
        for item in self.store.prefix_iterator(prefix.as_bytes()) {
            let (key, _) = item.map_err(dagindex_kvstore::StorageError::from).map_err(DagIndexError::from)?;
            // The iterator starts exactly at `prefix`; once a key no longer
            // matches it we've walked past this dag-prefix's contiguous block.
            let Ok(key_str) = std::str::from_utf8(&key) else { break };
            let Some(suffix) = key_str.strip_prefix(&prefix) else { break };
            if key_str == order_key_str {
                continue;
            }
            if let Ok(page_index) = PageIndex::from_str(suffix) {
                out.push(page_index);
            }
        }
        Ok(out)
    }
}
