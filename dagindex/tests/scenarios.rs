mod common;

use dagindex::config::DagIndexConfig;
use dagindex::testutil::TestBlockInfo;
use dagindex::{blocks_from_last_known, rebuild};

fn step4() -> DagIndexConfig {
    DagIndexConfig { step: 4, ..Default::default() }
}

#[test]
fn linear_chain() {
    let (_dir, store, index) = common::create_temp_index(step4());
    let g = TestBlockInfo::genesis();
    let a = TestBlockInfo::new("a", 1, vec![g.hash()]);
    let b = TestBlockInfo::new("b", 2, vec![a.hash()]);
    let c = TestBlockInfo::new("c", 3, vec![b.hash()]);
    for block in [&g, &a, &b, &c] {
        store.insert(block.clone());
        index.add_block(block).unwrap();
    }

    assert_eq!(index.get_order(), 4);
    let children_of_a = index.get_children(a.hash(), 1);
    assert_eq!(children_of_a.get(&b.hash()), Some(&2));

    let descendants = blocks_from_last_known(&index, &[a.hash()]);
    assert_eq!(descendants.len(), 2);
    assert!(descendants.contains(&b.hash()));
    assert!(descendants.contains(&c.hash()));
}

#[test]
fn fork() {
    let (_dir, store, index) = common::create_temp_index(step4());
    let g = TestBlockInfo::genesis();
    let a = TestBlockInfo::new("a", 1, vec![g.hash()]);
    let b1 = TestBlockInfo::new("b1", 2, vec![a.hash()]);
    let b2 = TestBlockInfo::new("b2", 2, vec![a.hash()]);
    for block in [&g, &a, &b1, &b2] {
        store.insert(block.clone());
        index.add_block(block).unwrap();
    }

    let children = index.get_children(a.hash(), 1);
    assert_eq!(children.get(&b1.hash()), Some(&2));
    assert_eq!(children.get(&b2.hash()), Some(&2));

    let descendants = blocks_from_last_known(&index, &[a.hash()]);
    assert_eq!(descendants.len(), 2);
    assert!(descendants.contains(&b1.hash()));
    assert!(descendants.contains(&b2.hash()));
}

#[test]
fn gap_edge() {
    let (_dir, store, index) = common::create_temp_index(step4());
    let g = TestBlockInfo::genesis();
    let a = TestBlockInfo::new("a", 1, vec![g.hash()]);
    let x = TestBlockInfo::new("x", 3, vec![g.hash(), a.hash()]);
    for block in [&g, &a, &x] {
        store.insert(block.clone());
        index.add_block(block).unwrap();
    }

    let children_of_genesis = index.get_children(g.hash(), 0);
    assert_eq!(children_of_genesis.len(), 1);
    assert!(!children_of_genesis.contains_key(&x.hash()));
    assert!(index.has(x.hash(), Some(3)));
}

#[test]
fn idempotent_readd() {
    let (_dir, store, index) = common::create_temp_index(step4());
    let g = TestBlockInfo::genesis();
    let a = TestBlockInfo::new("a", 1, vec![g.hash()]);
    let b = TestBlockInfo::new("b", 2, vec![a.hash()]);
    for block in [&g, &a, &b] {
        store.insert(block.clone());
    }
    index.add_block(&g).unwrap();
    index.add_block(&a).unwrap();
    index.add_block(&b).unwrap();
    let k = index.get_order();

    for _ in 0..3 {
        index.add_block(&b).unwrap();
    }
    assert_eq!(index.get_order(), k);
}

#[test]
fn removal_restores() {
    let (_dir, store, index) = common::create_temp_index(step4());
    let g = TestBlockInfo::genesis();
    let a = TestBlockInfo::new("a", 1, vec![g.hash()]);
    let b = TestBlockInfo::new("b", 2, vec![a.hash()]);
    let c = TestBlockInfo::new("c", 3, vec![b.hash()]);
    for block in [&g, &a, &b, &c] {
        store.insert(block.clone());
        index.add_block(block).unwrap();
    }
    assert_eq!(index.get_order(), 4);

    index.remove_block(&c).unwrap();
    assert_eq!(index.get_children(b.hash(), 2).len(), 0);
    assert_eq!(index.get_order(), 3);
}

#[test]
fn peer_behind() {
    let (_dir, store, index) = common::create_temp_index(DagIndexConfig { step: 4, max_blocks_inv: 500, ..Default::default() });
    let mut blocks = vec![TestBlockInfo::genesis()];
    for height in 1..=50u64 {
        let parent = blocks.last().unwrap().hash();
        blocks.push(TestBlockInfo::new(&format!("h{height}"), height, vec![parent]));
    }
    for block in &blocks {
        store.insert(block.clone());
        index.add_block(block).unwrap();
    }

    let result = blocks_from_last_known(&index, &[blocks[10].hash()]);
    for block in &blocks[11..] {
        assert!(result.contains(&block.hash()));
    }
    assert!(result.len() <= 10 + index.config().max_blocks_inv);
}

#[test]
fn peer_on_wrong_dag() {
    let (_dir, store, index) = common::create_temp_index(step4());
    let g = TestBlockInfo::genesis();
    let a = TestBlockInfo::new("a", 1, vec![g.hash()]);
    store.insert(g.clone());
    store.insert(a.clone());
    index.add_block(&g).unwrap();
    index.add_block(&a).unwrap();

    let unknown = TestBlockInfo::new("not-ours", 9, vec![]).hash();
    let result = blocks_from_last_known(&index, &[unknown]);
    assert!(result.contains(&g.hash()));
    assert!(result.contains(&a.hash()));
}

#[test]
fn cache_eviction_reads_through_to_backend() {
    let (_dir, store, index) =
        common::create_temp_index(DagIndexConfig { step: 4, pages_in_memory: 2, ..Default::default() });
    let g = TestBlockInfo::genesis();
    let a = TestBlockInfo::new("a", 4, vec![]);
    let b = TestBlockInfo::new("b", 8, vec![]);
    let c = TestBlockInfo::new("c", 12, vec![]);
    for block in [&g, &a, &b, &c] {
        store.insert(block.clone());
        index.add_block(block).unwrap();
    }

    // Four distinct page ranges touched with only 2 cache slots: genesis's page
    // must have been evicted by now, yet its data survives in the Backend.
    assert!(index.has(g.hash(), Some(0)));
    assert!(index.has(a.hash(), Some(4)));
    assert!(index.has(b.hash(), Some(8)));
    assert!(index.has(c.hash(), Some(12)));
}

#[test]
fn rebuild_from_pending_reconstructs_linear_chain() {
    let (_dir, store, index) = common::create_temp_index(step4());
    let g = TestBlockInfo::genesis();
    let a = TestBlockInfo::new("a", 1, vec![g.hash()]);
    let b = TestBlockInfo::new("b", 2, vec![a.hash()]);
    for block in [&g, &a, &b] {
        store.insert(block.clone());
    }

    rebuild(&index, &[], &[b.hash()]).unwrap();

    assert!(index.has(g.hash(), Some(0)));
    assert!(index.has(a.hash(), Some(1)));
    assert!(index.has(b.hash(), Some(2)));
    assert_eq!(index.get_order(), 3);
}
