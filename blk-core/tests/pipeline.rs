//! End-to-end Block Parser / Chain Index / Main-Chain Walker tests, covering
//! the boundary scenarios named in the distilled spec's testable-properties
//! section.

use blk_core::{parse_block, walk_main_chain, ByteReader, ChainIndex, NullResolver, ParserConfig};
use blk_types::{BlockSummary, CompressedHash, Hash32, KeyType};

const GENESIS_BLOCK_HEX: &str = "f9beb4d91d0100000100000000000000000000000000000000000000000000000000000000000000000000003ba3edfd7a7b12b27ac72c3e67768f617fc81bc3888a51323a9fb8aa4b1e5e4a29ab5f49ffff001d1dac2b7c0101000000010000000000000000000000000000000000000000000000000000000000000000ffffffff4d04ffff001d0104455468652054696d65732030332f4a616e2f32303039204368616e63656c6c6f72206f6e206272696e6b206f66207365636f6e64206261696c6f757420666f722062616e6b73ffffffff0100f2052a01000000434104678afdb0fe5548271967f1a67130b7105cd6a828e03909a67962e0ea1f61deb649f6bc3f4cef38c4f35504e51ec112de5c384df7ba0b8d578a4c702b6bf11d5fac00000000";

fn decode_hex(s: &str) -> Vec<u8> {
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
        .collect()
}

#[test]
fn genesis_block_parses_to_known_hash() {
    let bytes = decode_hex(GENESIS_BLOCK_HEX);
    let mut reader = ByteReader::from_bytes(bytes);
    let config = ParserConfig::default();
    let block = parse_block(&mut reader, &config, "blk00000.dat", 0).unwrap();

    assert_eq!(
        block.block_hash.display_hex(),
        "000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f"
    );
    assert_eq!(block.transactions.len(), 1);

    let coinbase = &block.transactions[0];
    assert!(coinbase.inputs[0].is_coinbase());
    assert_eq!(coinbase.outputs.len(), 1);
    assert_eq!(coinbase.outputs[0].value.value, 50_0000_0000);
    assert!(matches!(
        coinbase.outputs[0].key_type,
        KeyType::UncompressedPublicKey { .. }
    ));
}

#[test]
fn chain_index_and_walker_follow_parsed_blocks_to_genesis_sentinel() {
    let bytes = decode_hex(GENESIS_BLOCK_HEX);
    let mut reader = ByteReader::from_bytes(bytes);
    let config = ParserConfig::default();
    let genesis = parse_block(&mut reader, &config, "blk00000.dat", 0).unwrap();

    let mut index = ChainIndex::new();
    index.insert(genesis.summary.clone());

    let records = walk_main_chain(&index, genesis.summary.compressed_hash, &NullResolver);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].block_hash, genesis.block_hash);
}

#[test]
fn walk_with_gap_delegates_to_resolver() {
    use blk_core::{GapFill, ResolveByHash, ResolverError};

    struct StubResolver {
        reply: GapFill,
    }

    impl ResolveByHash for StubResolver {
        fn resolve(&self, _hash_display_hex: &str) -> Result<GapFill, ResolverError> {
            Ok(self.reply.clone())
        }
    }

    let h0 = blk_types::GENESIS_SENTINEL;
    let h1 = Hash32([0x11; 32]);
    let h2 = Hash32([0x22; 32]);
    let h3 = Hash32([0x33; 32]);

    let summary = |hash: Hash32, prev_hash: Hash32, prev_key: CompressedHash| BlockSummary {
        compressed_hash: hash.compressed(),
        block_hash: hash,
        prev_compressed_hash: prev_key,
        prev_block_hash: prev_hash,
        file_endpoint: "blk00000.dat".to_string(),
        byte_offset: 0,
        parsed_block_length: 0,
        raw_block_number: 0,
        timestamp: 0,
    };

    let mut index = ChainIndex::new();
    // H3's parent (H2) is missing locally -- a gap.
    index.insert(summary(h3, h2, h2.compressed()));
    index.insert(summary(h1, Hash32::ZERO, h0));

    let resolver = StubResolver {
        reply: GapFill {
            block_hash: h2,
            prev_block_hash: h1,
        },
    };

    let records = walk_main_chain(&index, h3.compressed(), &resolver);
    let hashes: Vec<Hash32> = records.into_iter().map(|r| r.block_hash).collect();
    assert_eq!(hashes, vec![h3, h1]);
}
