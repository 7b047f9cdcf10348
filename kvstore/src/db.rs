use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use rocksdb::{DBWithThreadMode, MultiThreaded, Options};

use crate::errors::{StorageError, StorageResult};

/// The ordered key-value store backing the DAG index.
///
/// Wraps a RocksDB handle the same way the rest of this codebase wraps storage
/// engines: a thin newtype around the vendor handle that `Deref`s to it, so callers
/// can reach the full RocksDB API while construction/teardown stay centralised here.
pub struct KvStore {
    inner: DBWithThreadMode<MultiThreaded>,
    path: PathBuf,
}

impl KvStore {
    /// Opens (or creates) the store at `path`.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut options = Options::default();
        options.create_if_missing(true);
        options.create_missing_column_families(true);
        let inner = DBWithThreadMode::<MultiThreaded>::open(&options, &path)?;
        Ok(Self { inner, path })
    }

    /// Reads the bytes behind `key`, or `None` if the key is absent. Absence is not
    /// an error: only a genuine RocksDB failure produces `Err` (§4.1).
    pub fn get(&self, key: impl AsRef<[u8]>) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.inner.get(key)?)
    }

    /// Writes `value` under `key`, overwriting any previous value.
    pub fn put(&self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> StorageResult<()> {
        self.inner.put(key, value)?;
        Ok(())
    }

    /// Deletes `key`. Deleting an absent key is not an error.
    pub fn delete(&self, key: impl AsRef<[u8]>) -> StorageResult<()> {
        self.inner.delete(key)?;
        Ok(())
    }

    /// Atomically applies a batch of writes produced via [`crate::writer::BatchWriter`].
    pub fn write_batch(&self, batch: rocksdb::WriteBatch) -> StorageResult<()> {
        self.inner.write(batch)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Deref for KvStore {
    type Target = DBWithThreadMode<MultiThreaded>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for KvStore {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

/// Destroys the store directory at `path`, dropping every key it held. Used by
/// re-indexing to start from a clean slate (§4.1 `destroy`).
pub fn destroy(path: impl AsRef<Path>) -> StorageResult<()> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(());
    }
    let options = Options::default();
    DBWithThreadMode::<MultiThreaded>::destroy(&options, path).map_err(StorageError::from)
}
