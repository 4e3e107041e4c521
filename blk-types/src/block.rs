use crate::hash::Hash32;
use crate::header::Header;
use crate::summary::BlockSummary;
use crate::transaction::Transaction;

/// A fully decoded on-disk block record. Transient: the parser drops it once
/// its `BlockSummary` has been extracted into the Chain Index.
#[derive(Clone, Debug)]
pub struct Block {
    pub magic: u32,
    pub block_length: u32,
    pub header: Header,
    pub block_hash: Hash32,
    pub tx_count: u64,
    pub transactions: Vec<Transaction>,
    pub summary: BlockSummary,
}
