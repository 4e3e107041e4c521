use crate::hash::Hash32;
use crate::raw::RawField;

/// The 80-byte block header, each field carried alongside the exact bytes it
/// was decoded from so `block_hash` reproduces the pre-image byte-for-byte
/// even when a field was reconstructed by a recovery heuristic.
#[derive(Clone, Debug)]
pub struct Header {
    pub version: RawField<u32>,
    pub prev_block_hash: RawField<Hash32>,
    pub merkle_root: RawField<Hash32>,
    pub timestamp: RawField<u32>,
    pub target: RawField<u32>,
    pub nonce: RawField<u32>,
}

impl Header {
    pub const SIZE: usize = 80;

    /// Concatenation of every field's raw bytes, in field order; the
    /// double-SHA256 pre-image (computed by `blk-hashing`, which depends on
    /// this crate rather than the reverse).
    pub fn raw_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::SIZE);
        out.extend_from_slice(&self.version.raw);
        out.extend_from_slice(&self.prev_block_hash.raw);
        out.extend_from_slice(&self.merkle_root.raw);
        out.extend_from_slice(&self.timestamp.raw);
        out.extend_from_slice(&self.target.raw);
        out.extend_from_slice(&self.nonce.raw);
        out
    }
}
