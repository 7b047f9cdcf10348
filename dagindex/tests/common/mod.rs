use std::sync::Arc;

use dagindex::config::DagIndexConfig;
use dagindex::testutil::InMemoryBlockInfoStore;
use dagindex::DagIndex;
use dagindex_kvstore::KvStore;

pub fn create_temp_index(
    config: DagIndexConfig,
) -> (tempfile::TempDir, InMemoryBlockInfoStore, DagIndex<InMemoryBlockInfoStore>) {
    let db_tempdir = tempfile::tempdir().unwrap();
    let kv = Arc::new(KvStore::open(db_tempdir.path()).unwrap());
    let store = InMemoryBlockInfoStore::new();
    let index = DagIndex::new(kv, "gen0".to_string(), config, store.clone());
    (db_tempdir, store, index)
}
