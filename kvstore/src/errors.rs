use thiserror::Error;

/// I/O-layer errors surfaced by the key-value store adapter.
///
/// A missing key is never represented as an error (§4.1 of the spec): callers get
/// `Ok(None)` from [`crate::KvStore::get`]. This enum only carries genuine storage
/// failures -- a corrupt database, a closed handle, an OS-level I/O error.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("rocksdb error: {0}")]
    RocksDb(#[from] rocksdb::Error),

    #[error("store at {0} was already destroyed or never opened")]
    NotOpen(String),

    /// Reserved for layered access patterns built on top of this adapter (e.g. a
    /// typed "get or error" wrapper); [`crate::KvStore::get`] itself never produces
    /// this -- a missing key there is `Ok(None)`, not an error.
    #[error("key {0} not found in store")]
    KeyNotFound(String),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Collapses a [`StorageError::KeyNotFound`] into `None`, for call sites layered on
/// top of this adapter that want `Option`-shaped absence instead of matching the
/// error enum by hand.
pub trait StoreResultExtensions<T> {
    fn unwrap_option(self) -> Option<T>;
}

impl<T> StoreResultExtensions<T> for StorageResult<T> {
    fn unwrap_option(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(StorageError::KeyNotFound(_)) => None,
            Err(err) => panic!("unexpected storage error: {err:?}"),
        }
    }
}
