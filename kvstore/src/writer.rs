use rocksdb::WriteBatch;

use crate::db::KvStore;
use crate::errors::StorageResult;

/// Abstraction over direct vs. batched writes, so the Index Backend can flush a
/// page write and an order-counter adjustment as one atomic unit (I6) without the
/// call site caring which mode is in play. Matches the teacher's `DbWriter` split
/// between a direct, per-call writer and a `WriteBatch`-backed one.
pub trait DbWriter {
    fn put(&mut self, key: &[u8], value: &[u8]) -> StorageResult<()>;
    fn delete(&mut self, key: &[u8]) -> StorageResult<()>;
}

/// Writes straight through to the store, one call at a time. Errors propagate
/// immediately (§4.2: writes are not downgraded to absent).
pub struct DirectWriter<'a> {
    store: &'a KvStore,
}

impl<'a> DirectWriter<'a> {
    pub fn new(store: &'a KvStore) -> Self {
        Self { store }
    }
}

impl DbWriter for DirectWriter<'_> {
    fn put(&mut self, key: &[u8], value: &[u8]) -> StorageResult<()> {
        self.store.put(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> StorageResult<()> {
        self.store.delete(key)
    }
}

/// Accumulates writes into a single `WriteBatch`, committed by the caller via
/// [`KvStore::write_batch`]. RocksDB batch mutation itself cannot fail.
pub struct BatchWriter<'a> {
    batch: &'a mut WriteBatch,
}

impl<'a> BatchWriter<'a> {
    pub fn new(batch: &'a mut WriteBatch) -> Self {
        Self { batch }
    }
}

impl DbWriter for BatchWriter<'_> {
    fn put(&mut self, key: &[u8], value: &[u8]) -> StorageResult<()> {
        self.batch.put(key, value);
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> StorageResult<()> {
        self.batch.delete(key);
        Ok(())
    }
}

impl<T: DbWriter> DbWriter for &mut T {
    fn put(&mut self, key: &[u8], value: &[u8]) -> StorageResult<()> {
        (**self).put(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> StorageResult<()> {
        (**self).delete(key)
    }
}
