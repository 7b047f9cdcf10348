//! The Main DAG Index: a paged, cached, on-disk map from block height to the
//! blocks at that height and their direct children, plus the descendant-walk
//! and startup-reconstruction operations built on top of it.

pub mod backend;
pub mod block_info;
pub mod cache;
pub mod config;
pub mod error;
pub mod hash;
pub mod index;
pub mod lock;
pub mod page;
pub mod rebuild;
pub mod testutil;
pub mod walker;

pub use backend::Backend;
pub use block_info::{BlockInfo, BlockInfoStore};
pub use cache::PageCache;
pub use config::DagIndexConfig;
pub use error::{DagIndexError, DagIndexResult};
pub use hash::{BlockHash, BlockHeight};
pub use index::DagIndex;
pub use lock::KeyedMutex;
pub use page::{PageEntry, PageIndex, PageRecord};
pub use rebuild::rebuild;
pub use walker::{blocks_from_last_known, blocks_from_last_known_hex};
