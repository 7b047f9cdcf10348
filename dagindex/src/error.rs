use dagindex_kvstore::StorageError;
use thiserror::Error;

use crate::hash::BlockHash;

/// Error taxonomy for the index (§7): IOError, InvariantViolation, InputError.
#[derive(Error, Debug)]
pub enum DagIndexError {
    /// The KV backend could not satisfy a write. Reads never produce this variant
    /// -- they are downgraded to "absent" and debug-logged instead (§4.2, §7).
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Deserializing a persisted page record failed.
    #[error("malformed page record: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// `rebuild` (§4.6) hit a hash that is supposed to be a known, good block but
    /// whose `BlockInfo` is missing or marked bad. Startup aborts on this.
    #[error("invariant violation while rebuilding index at {0}: {1}")]
    InvariantViolation(BlockHash, &'static str),

    /// A caller passed a malformed hash hex string or a height that cannot be
    /// reconciled with the block store (§7 InputError).
    #[error("invalid input: {0}")]
    InputError(String),
}

pub type DagIndexResult<T> = std::result::Result<T, DagIndexError>;
