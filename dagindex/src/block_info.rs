use crate::hash::{BlockHash, BlockHeight};

/// An opaque record supplied by the block store (§3 "BlockInfo (external)").
///
/// The index only ever needs these six accessors; it never inspects a block's
/// transactions, signatures, or other payload -- that is out of scope (§1).
pub trait BlockInfo {
    fn hash(&self) -> BlockHash;
    fn height(&self) -> BlockHeight;
    fn parent_hashes(&self) -> &[BlockHash];
    fn is_bad(&self) -> bool;
    fn is_final(&self) -> bool;
    fn concilium_id(&self) -> u64;
}

/// The `BlockInfoStore` capability consumed by the index (§6).
///
/// `get_block_info` returning `None` is not an error: a parent referenced by a
/// child we just added may legitimately not be stored yet during a reorg (§4.4
/// addBlock step 2, §7 propagation policy).
pub trait BlockInfoStore {
    type Info: BlockInfo + Clone;

    fn get_block_info(&self, hash: BlockHash) -> Option<Self::Info>;
    fn has_block(&self, hash: BlockHash) -> bool;
    fn save_block_info(&self, info: Self::Info);
    fn last_applied_block_hashes(&self) -> Vec<BlockHash>;
    fn pending_block_hashes(&self) -> Vec<BlockHash>;
}
