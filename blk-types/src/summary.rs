use crate::hash::{CompressedHash, Hash32};
use serde::{Deserialize, Serialize};

/// The compact record the Chain Index and the CSV manifest are built from.
/// Once a block's summary has been produced the full `Block` may be dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSummary {
    pub compressed_hash: CompressedHash,
    pub block_hash: Hash32,
    pub prev_compressed_hash: CompressedHash,
    pub prev_block_hash: Hash32,
    pub file_endpoint: String,
    pub byte_offset: u64,
    pub parsed_block_length: u32,
    pub raw_block_number: u64,
    pub timestamp: u32,
}
