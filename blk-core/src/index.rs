//! A flat `compressedHash -> BlockSummary` map populated strictly in file
//! order (§4.7). First insertion wins on key collision; the duplicate is
//! logged rather than replacing the entry.

use blk_types::{CompressedHash, BlockSummary};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct ChainIndex {
    entries: HashMap<CompressedHash, BlockSummary>,
}

impl ChainIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `summary` unless its key is already present, in which case the
    /// existing entry is kept and `false` is returned.
    pub fn insert(&mut self, summary: BlockSummary) -> bool {
        if self.entries.contains_key(&summary.compressed_hash) {
            log::warn!(
                "duplicate chain index key {} at {}:{} (keeping first insertion)",
                summary.compressed_hash,
                summary.file_endpoint,
                summary.byte_offset
            );
            false
        } else {
            self.entries.insert(summary.compressed_hash, summary);
            true
        }
    }

    pub fn get(&self, key: &CompressedHash) -> Option<&BlockSummary> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Mutex-guarded wrapper enabling concurrent file-granularity ingestion
/// (§5) without changing `ChainIndex`'s own API.
#[derive(Default)]
pub struct SharedChainIndex {
    inner: Mutex<ChainIndex>,
}

impl SharedChainIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, summary: BlockSummary) -> bool {
        self.inner.lock().expect("chain index mutex poisoned").insert(summary)
    }

    pub fn get(&self, key: &CompressedHash) -> Option<BlockSummary> {
        self.inner
            .lock()
            .expect("chain index mutex poisoned")
            .get(key)
            .cloned()
    }

    pub fn into_inner(self) -> ChainIndex {
        self.inner.into_inner().expect("chain index mutex poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blk_types::Hash32;

    fn summary(compressed_hash: CompressedHash, byte_offset: u64) -> BlockSummary {
        BlockSummary {
            compressed_hash,
            block_hash: Hash32::ZERO,
            prev_compressed_hash: CompressedHash([0u8; 16]),
            prev_block_hash: Hash32::ZERO,
            file_endpoint: "blk00000.dat".to_string(),
            byte_offset,
            parsed_block_length: 0,
            raw_block_number: 0,
            timestamp: 0,
        }
    }

    #[test]
    fn first_insertion_wins_on_duplicate_key() {
        let mut index = ChainIndex::new();
        let key = CompressedHash([1u8; 16]);
        assert!(index.insert(summary(key, 0)));
        assert!(!index.insert(summary(key, 100)));
        assert_eq!(index.get(&key).unwrap().byte_offset, 0);
    }

    #[test]
    fn distinct_keys_both_insert() {
        let mut index = ChainIndex::new();
        assert!(index.insert(summary(CompressedHash([1u8; 16]), 0)));
        assert!(index.insert(summary(CompressedHash([2u8; 16]), 0)));
        assert_eq!(index.len(), 2);
    }
}
