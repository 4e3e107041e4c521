//! Predecessor-walking reconstruction of the main chain (§4.7/§8.6).

use crate::index::ChainIndex;
use blk_types::{CompressedHash, Hash32, GENESIS_SENTINEL};

/// Defensive cap on walk length; real chains never approach this.
const MAX_WALK_STEPS: u64 = 1 << 24;

/// The external, network-facing collaborator used to fill gaps in a locally
/// built `ChainIndex`. Never constructed inside this crate (§9 Resolver
/// boundary) — callers inject a `Box<dyn ResolveByHash>`.
pub trait ResolveByHash {
    fn resolve(&self, hash_display_hex: &str) -> Result<GapFill, ResolverError>;
}

/// The result of resolving a hash externally: the resolved block's own hash
/// and the hash of its parent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GapFill {
    pub block_hash: Hash32,
    pub prev_block_hash: Hash32,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolverError {
    #[error("resolver request failed: {0}")]
    RequestFailed(String),
    #[error("resolver response could not be parsed: {0}")]
    Unparseable(String),
}

/// A single emitted main-chain row, in the column order the CSV writer uses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalkRecord {
    pub block_hash: Hash32,
    pub file_endpoint: String,
    pub byte_offset: u64,
    pub parsed_block_length: u32,
    pub raw_block_number: u64,
    pub timestamp: u32,
}

/// A `ResolveByHash` that always fails; used for fully offline `map` mode
/// runs against a closed, complete index.
pub struct NullResolver;

impl ResolveByHash for NullResolver {
    fn resolve(&self, hash_display_hex: &str) -> Result<GapFill, ResolverError> {
        Err(ResolverError::RequestFailed(format!(
            "no resolver configured, cannot resolve {hash_display_hex}"
        )))
    }
}

/// Walks `index` backward from `start_key` to the genesis sentinel,
/// delegating to `resolver` whenever the next key is missing or placeholder.
/// Returns every record emitted before the walk ended, whether by reaching
/// genesis or because `resolver` could not supply a predecessor.
pub fn walk_main_chain(
    index: &ChainIndex,
    start_key: CompressedHash,
    resolver: &dyn ResolveByHash,
) -> Vec<WalkRecord> {
    let mut records = Vec::new();
    let mut key = start_key;

    for _ in 0..MAX_WALK_STEPS {
        let summary = match index.get(&key) {
            Some(s) => s,
            None => {
                log::warn!("walk could not find summary for key {key}, stopping");
                break;
            }
        };

        records.push(WalkRecord {
            block_hash: summary.block_hash,
            file_endpoint: summary.file_endpoint.clone(),
            byte_offset: summary.byte_offset,
            parsed_block_length: summary.parsed_block_length,
            raw_block_number: summary.raw_block_number,
            timestamp: summary.timestamp,
        });

        let mut next_key = summary.prev_compressed_hash;
        if next_key == GENESIS_SENTINEL {
            break;
        }

        let next_entry_missing_or_placeholder = match index.get(&next_key) {
            None => true,
            Some(next_summary) => next_summary.block_hash == Hash32::ZERO,
        };

        if next_entry_missing_or_placeholder {
            match resolver.resolve(&summary.prev_block_hash.display_hex()) {
                Ok(gap_fill) => {
                    next_key = gap_fill.prev_block_hash.compressed();
                    log::info!(
                        "resolved gap at {key}: substituted {next_key} via external resolver"
                    );
                }
                Err(err) => {
                    log::warn!("walk could not resolve predecessor of {key}: {err}");
                    break;
                }
            }
        }

        key = next_key;
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use blk_types::BlockSummary;

    fn summary(
        compressed_hash: CompressedHash,
        block_hash: Hash32,
        prev_compressed_hash: CompressedHash,
        prev_block_hash: Hash32,
    ) -> BlockSummary {
        BlockSummary {
            compressed_hash,
            block_hash,
            prev_compressed_hash,
            prev_block_hash,
            file_endpoint: "blk00000.dat".to_string(),
            byte_offset: 0,
            parsed_block_length: 0,
            raw_block_number: 0,
            timestamp: 0,
        }
    }

    struct StubResolver {
        reply: GapFill,
    }

    impl ResolveByHash for StubResolver {
        fn resolve(&self, _hash_display_hex: &str) -> Result<GapFill, ResolverError> {
            Ok(self.reply.clone())
        }
    }

    #[test]
    fn walk_terminates_at_genesis_sentinel() {
        let h0_compressed = GENESIS_SENTINEL;
        let h1_hash = Hash32([1u8; 32]);
        let h1_compressed = h1_hash.compressed();

        let mut index = ChainIndex::new();
        index.insert(summary(h1_compressed, h1_hash, h0_compressed, Hash32::ZERO));

        let records = walk_main_chain(&index, h1_compressed, &NullResolver);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].block_hash, h1_hash);
    }

    #[test]
    fn walk_fills_gap_via_resolver() {
        let h0 = GENESIS_SENTINEL;
        let h1_hash = Hash32([1u8; 32]);
        let h1_compressed = h1_hash.compressed();
        let h2_hash = Hash32([2u8; 32]);
        let h2_compressed = h2_hash.compressed();
        let h3_hash = Hash32([3u8; 32]);
        let h3_compressed = h3_hash.compressed();

        // H3 -> H2 (missing, gap) -> resolver returns H1 as parent-of-parent -> H1 -> H0 (genesis)
        let mut index = ChainIndex::new();
        index.insert(summary(h3_compressed, h3_hash, h2_compressed, h2_hash));
        index.insert(summary(h1_compressed, h1_hash, h0, Hash32::ZERO));

        let resolver = StubResolver {
            reply: GapFill {
                block_hash: h2_hash,
                prev_block_hash: h1_hash,
            },
        };

        let records = walk_main_chain(&index, h3_compressed, &resolver);
        let hashes: Vec<Hash32> = records.iter().map(|r| r.block_hash).collect();
        assert_eq!(hashes, vec![h3_hash, h1_hash]);
    }
}
