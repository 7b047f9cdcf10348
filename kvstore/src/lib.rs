//! A thin, ordered key-value store adapter (§4.1 "KV Store Adapter").
//!
//! This crate imposes no semantics on keys or values -- that belongs to layers
//! built on top, such as the Index Backend in the `dagindex` crate. It exists
//! solely to centralise opening, reading, writing, and destroying the embedded
//! RocksDB database.

mod db;
mod errors;
mod writer;

pub use db::{destroy, KvStore};
pub use errors::{StorageError, StorageResult, StoreResultExtensions};
pub use writer::{BatchWriter, DbWriter, DirectWriter};
