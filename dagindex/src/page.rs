use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::hash::{BlockHash, BlockHeight};

pub type PageIndex = u64;

/// One row of a [`PageRecord`] (§3 PageEntry).
///
/// `processed = true` marks a "true vertex": a block that was itself passed to
/// `addBlock`. `processed = false` marks a back-pointer placeholder: the hash is
/// known only because a child we *did* add names it as a parent. `children` lists
/// only direct descendants, i.e. those at exactly `height + 1` (I3).
///
/// Serializes as a plain two-element JSON array, matching the wire shape in §6:
/// `[<processed:bool>, { "<childHashHex>": <childHeight:int>, ... }]`. Serde gives
/// tuple structs with more than one field array serialization for free, so no
/// manual `Serialize`/`Deserialize` impl is needed here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageEntry(pub bool, pub HashMap<BlockHash, BlockHeight>);

impl PageEntry {
    pub fn processed(&self) -> bool {
        self.0
    }

    pub fn children(&self) -> &HashMap<BlockHash, BlockHeight> {
        &self.1
    }

    pub fn placeholder() -> Self {
        Self(false, HashMap::new())
    }

    pub fn promote(&mut self) {
        self.0 = true;
    }
}

/// `{ BlockHash -> PageEntry }`, the persisted unit the Index Backend reads and
/// writes as a whole (§3 PageRecord, §6 JSON shape).
pub type PageRecord = HashMap<BlockHash, PageEntry>;

/// Builds the on-disk key for a page: `"<dagPrefix>_<pageIndex>"` (§6).
pub fn page_key(dag_prefix: &str, page_index: PageIndex) -> Vec<u8> {
    format!("{dag_prefix}_{page_index}").into_bytes()
}

/// Builds the on-disk key for the order counter: `"<dagPrefix>_order"` (§3, §6).
pub fn order_key(dag_prefix: &str) -> Vec<u8> {
    format!("{dag_prefix}_order").into_bytes()
}
