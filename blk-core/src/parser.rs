//! Composes the Byte Reader, Validator, Recovery, Hasher, and Script
//! Classifier into the routine that consumes one on-disk block record
//! (§4.6).

use crate::classifier;
use crate::reader::ByteReader;
use crate::recovery;
use crate::validator;
use blk_types::{
    Block, BlkError, BlkResult, BlockSummary, CompressedHash, Hash32, Header, Input, Output,
    RawField, Transaction,
};
use std::io::{Read, Seek};

/// Tunable knobs the Block Parser needs beyond what's encoded in the wire
/// format itself.
#[derive(Clone, Debug)]
pub struct ParserConfig {
    pub max_output_value: u64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_output_value: validator::DEFAULT_MAX_OUTPUT_VALUE,
        }
    }
}

/// Parses the next block record from `reader`. `file_endpoint` and
/// `raw_block_number` are carried through into the emitted `BlockSummary`
/// unchanged; they identify where this block lives on disk.
pub fn parse_block<S: Read + Seek>(
    reader: &mut ByteReader<S>,
    config: &ParserConfig,
    file_endpoint: &str,
    raw_block_number: u64,
) -> BlkResult<Block> {
    let magic = read_magic(reader)?;
    let byte_offset = reader.tell()?.saturating_sub(4);

    let block_length = reader.u32_le()?;
    if !validator::is_valid_block_length(block_length.value) {
        return Err(BlkError::BadBlockLength(block_length.value));
    }

    reader.reset_block_counter();

    let header = read_header(reader)?;
    let header_bytes = header.raw_bytes();
    let block_hash = blk_hashing::double_sha256(&header_bytes);
    let compressed_hash = block_hash.compressed();
    let prev_compressed_hash = header.prev_block_hash.value.compressed();

    let tx_count = reader.varint()?;
    let mut transactions = Vec::with_capacity(tx_count.value as usize);
    for _ in 0..tx_count.value {
        transactions.push(read_transaction(reader, config)?);
    }

    let consumed = reader.bytes_consumed();
    if consumed > block_length.value as u64 {
        return Err(BlkError::BlockLengthExceeded {
            consumed,
            declared: block_length.value as u64,
        });
    } else if consumed < block_length.value as u64 {
        reader.skip_to_end_of_block(block_length.value as u64)?;
    }

    let summary = BlockSummary {
        compressed_hash,
        block_hash,
        prev_compressed_hash,
        prev_block_hash: header.prev_block_hash.value,
        file_endpoint: file_endpoint.to_string(),
        byte_offset,
        parsed_block_length: block_length.value,
        raw_block_number,
        timestamp: header.timestamp.value,
    };

    Ok(Block {
        magic: magic.value,
        block_length: block_length.value,
        header,
        block_hash,
        tx_count: tx_count.value,
        transactions,
        summary,
    })
}

fn read_magic<S: Read + Seek>(reader: &mut ByteReader<S>) -> BlkResult<RawField<u32>> {
    let magic = reader.u32_le()?;
    if validator::is_valid_magic(magic.value) {
        Ok(magic)
    } else {
        recovery::look_for_magic(reader)
    }
}

fn read_header<S: Read + Seek>(reader: &mut ByteReader<S>) -> BlkResult<Header> {
    let version = read_header_version(reader)?;
    let prev_block_hash = reader.hash32()?;
    let merkle_root = reader.hash32()?;
    let timestamp = read_timestamp(reader)?;
    let target = reader.u32_le()?;
    let nonce = reader.u32_le()?;

    Ok(Header {
        version,
        prev_block_hash,
        merkle_root,
        timestamp,
        target,
        nonce,
    })
}

fn read_header_version<S: Read + Seek>(reader: &mut ByteReader<S>) -> BlkResult<RawField<u32>> {
    let version = reader.u32_le()?;
    if validator::is_valid_header_version(version.value) {
        return Ok(version);
    }
    let fixed = recovery::rewind_and_read32(reader)?;
    if validator::is_valid_header_version(fixed.value) {
        Ok(fixed)
    } else {
        Err(BlkError::BadHeaderVersion(version.value))
    }
}

fn read_timestamp<S: Read + Seek>(reader: &mut ByteReader<S>) -> BlkResult<RawField<u32>> {
    let timestamp = reader.u32_le()?;
    if validator::is_valid_timestamp(timestamp.value) {
        Ok(timestamp)
    } else {
        Err(BlkError::BadTimestamp(timestamp.value))
    }
}

fn read_transaction<S: Read + Seek>(
    reader: &mut ByteReader<S>,
    config: &ParserConfig,
) -> BlkResult<Transaction> {
    let version = read_tx_version(reader)?;

    let mut input_count = reader.varint()?;
    if input_count.value == 0 {
        input_count = recovery::input_count_zero_recover(reader)?;
    }

    let mut inputs = Vec::with_capacity(input_count.value as usize);
    for i in 0..input_count.value {
        inputs.push(read_input(reader, i == 0)?);
    }

    let output_count = reader.varint()?;
    let mut outputs = Vec::with_capacity(output_count.value as usize);
    for _ in 0..output_count.value {
        outputs.push(read_output(reader, config)?);
    }

    let locktime = read_locktime(reader)?;

    let mut tx = Transaction {
        version,
        input_count,
        inputs,
        output_count,
        outputs,
        locktime,
        tx_hash: Hash32::ZERO,
    };
    tx.tx_hash = blk_hashing::double_sha256(&tx.raw_bytes());
    Ok(tx)
}

fn read_tx_version<S: Read + Seek>(reader: &mut ByteReader<S>) -> BlkResult<RawField<u32>> {
    let version = reader.u32_le()?;
    if validator::is_valid_tx_version(version.value) {
        return Ok(version);
    }
    if version.value == 0x0100_0000 {
        let fixed = recovery::reread_tx_version(reader)?;
        if validator::is_valid_tx_version(fixed.value) {
            return Ok(fixed);
        }
    }
    Err(BlkError::BadTxVersion(version.value))
}

fn read_input<S: Read + Seek>(reader: &mut ByteReader<S>, is_first: bool) -> BlkResult<Input> {
    let prev_tx_hash = reader.hash32()?;
    let prev_out_index = read_prev_out_index(reader, is_first)?;
    let script_len = reader.varint()?;
    let script = reader.take(script_len.value as usize)?;
    let sequence = read_sequence(reader)?;

    Ok(Input {
        prev_tx_hash,
        prev_out_index,
        script_len,
        script,
        sequence,
    })
}

/// `prevOutIndex` doubles as the coinbase sentinel (`0xFFFFFFFF`) on a
/// transaction's first input; the Validator's `txIndex` predicate otherwise
/// bounds it to a plausible output position. Non-first inputs are never
/// coinbase and so skip the sentinel check.
fn read_prev_out_index<S: Read + Seek>(
    reader: &mut ByteReader<S>,
    is_first: bool,
) -> BlkResult<RawField<u32>> {
    let index = reader.u32_le()?;
    if is_first && index.value == 0xFFFF_FFFF {
        return Ok(index);
    }
    if validator::is_valid_tx_index(index.value) {
        Ok(index)
    } else {
        Err(BlkError::BadTxIndex(index.value))
    }
}

fn read_sequence<S: Read + Seek>(reader: &mut ByteReader<S>) -> BlkResult<RawField<u32>> {
    let sequence = reader.u32_le()?;
    let sequence_raw: [u8; 4] = sequence.raw.as_slice().try_into().unwrap();
    if validator::is_valid_sequence(&sequence_raw) {
        return Ok(sequence);
    }
    let fixed = recovery::step_back5_reread4(reader)?;
    let fixed_raw: [u8; 4] = fixed.raw.as_slice().try_into().unwrap();
    if validator::is_valid_sequence(&fixed_raw) {
        Ok(fixed)
    } else {
        Err(BlkError::BadSequence(fixed_raw))
    }
}

fn read_locktime<S: Read + Seek>(reader: &mut ByteReader<S>) -> BlkResult<RawField<u32>> {
    let locktime = reader.u32_le()?;
    if validator::is_valid_locktime(locktime.value) {
        return Ok(locktime);
    }
    let fixed = recovery::step_back5_reread4(reader)?;
    if validator::is_valid_locktime(fixed.value) {
        Ok(fixed)
    } else {
        Err(BlkError::BadLocktime(fixed.value))
    }
}

fn read_output<S: Read + Seek>(
    reader: &mut ByteReader<S>,
    config: &ParserConfig,
) -> BlkResult<Output> {
    let value = read_output_value(reader, config.max_output_value)?;
    let script_len = reader.varint()?;
    let script = reader.take(script_len.value as usize)?;

    let key_type = if script.is_empty() {
        blk_types::KeyType::Null
    } else {
        classifier::classify(&script)
    };
    let addresses = classifier::derive_addresses(&key_type);

    Ok(Output {
        value,
        script_len,
        script,
        key_type,
        addresses,
    })
}

fn read_output_value<S: Read + Seek>(
    reader: &mut ByteReader<S>,
    max_output_value: u64,
) -> BlkResult<RawField<u64>> {
    let value = reader.u64_le()?;
    if validator::is_valid_output_value(value.value, max_output_value) {
        Ok(value)
    } else {
        Err(BlkError::BadOutputValue(value.value))
    }
}

/// Convenience used by `map` mode: recompute a block's hash from its already
/// known header bytes, without re-running the rest of the parser.
pub fn recompute_block_hash(header_bytes: &[u8]) -> Hash32 {
    blk_hashing::double_sha256(header_bytes)
}

pub fn compressed_hash_of(hash: &Hash32) -> CompressedHash {
    hash.compressed()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_varint(out: &mut Vec<u8>, n: u64) {
        if n < 0xFD {
            out.push(n as u8);
        } else if n <= 0xFFFF {
            out.push(0xFD);
            out.extend_from_slice(&(n as u16).to_le_bytes());
        } else if n <= 0xFFFF_FFFF {
            out.push(0xFE);
            out.extend_from_slice(&(n as u32).to_le_bytes());
        } else {
            out.push(0xFF);
            out.extend_from_slice(&n.to_le_bytes());
        }
    }

    fn build_coinbase_block() -> Vec<u8> {
        let mut body = Vec::new();
        // header: version, prevHash(32 zero), merkleRoot(32 arbitrary), timestamp, target, nonce
        body.extend_from_slice(&1u32.to_le_bytes());
        body.extend_from_slice(&[0u8; 32]);
        body.extend_from_slice(&[0x11u8; 32]);
        body.extend_from_slice(&validator::GENESIS_EPOCH.to_le_bytes());
        body.extend_from_slice(&0x1d00ffffu32.to_le_bytes());
        body.extend_from_slice(&0u32.to_le_bytes());

        // txCount = 1
        push_varint(&mut body, 1);

        // one coinbase transaction
        body.extend_from_slice(&1u32.to_le_bytes()); // version
        push_varint(&mut body, 1); // input count
        body.extend_from_slice(&[0u8; 32]); // prevTxHash = 0
        body.extend_from_slice(&0xFFFF_FFFFu32.to_le_bytes()); // prevOutIndex
        let script = vec![0x01, 0xAB];
        push_varint(&mut body, script.len() as u64);
        body.extend_from_slice(&script);
        body.extend_from_slice(&0xFFFF_FFFFu32.to_le_bytes()); // sequence

        push_varint(&mut body, 1); // output count
        body.extend_from_slice(&(50_0000_0000u64).to_le_bytes()); // value
        let mut out_script = vec![0x41];
        out_script.extend_from_slice(&[0x04u8; 65]);
        out_script.push(0xAC);
        push_varint(&mut body, out_script.len() as u64);
        body.extend_from_slice(&out_script);

        body.extend_from_slice(&0u32.to_le_bytes()); // locktime

        let mut full = Vec::new();
        full.extend_from_slice(&validator::MAGIC_MAINNET.to_le_bytes());
        full.extend_from_slice(&(body.len() as u32).to_le_bytes());
        full.extend_from_slice(&body);
        full
    }

    #[test]
    fn parses_single_coinbase_block() {
        let bytes = build_coinbase_block();
        let mut reader = ByteReader::from_bytes(bytes);
        let config = ParserConfig::default();
        let block = parse_block(&mut reader, &config, "blk00000.dat", 0).unwrap();

        assert_eq!(block.tx_count, 1);
        assert_eq!(block.transactions.len(), 1);
        let tx = &block.transactions[0];
        assert!(tx.inputs[0].is_coinbase());
        assert_eq!(tx.outputs[0].value.value, 50_0000_0000);
        assert!(matches!(
            tx.outputs[0].key_type,
            blk_types::KeyType::UncompressedPublicKey { .. }
        ));
    }

    #[test]
    fn varint_0xfd_boundary_round_trips_tx_count() {
        let mut body = Vec::new();
        body.extend_from_slice(&1u32.to_le_bytes());
        body.extend_from_slice(&[0u8; 32]);
        body.extend_from_slice(&[0x22u8; 32]);
        body.extend_from_slice(&validator::GENESIS_EPOCH.to_le_bytes());
        body.extend_from_slice(&0u32.to_le_bytes());
        body.extend_from_slice(&0u32.to_le_bytes());

        push_varint(&mut body, 253);
        for _ in 0..253u32 {
            body.extend_from_slice(&1u32.to_le_bytes());
            push_varint(&mut body, 1);
            body.extend_from_slice(&[0u8; 32]);
            body.extend_from_slice(&0xFFFF_FFFFu32.to_le_bytes());
            push_varint(&mut body, 0);
            body.extend_from_slice(&0xFFFF_FFFFu32.to_le_bytes());
            push_varint(&mut body, 1);
            body.extend_from_slice(&1u64.to_le_bytes());
            push_varint(&mut body, 0);
            body.extend_from_slice(&0u32.to_le_bytes());
        }

        let mut full = Vec::new();
        full.extend_from_slice(&validator::MAGIC_MAINNET.to_le_bytes());
        full.extend_from_slice(&(body.len() as u32).to_le_bytes());
        full.extend_from_slice(&body);

        let mut reader = ByteReader::from_bytes(full);
        let config = ParserConfig::default();
        let block = parse_block(&mut reader, &config, "blk00000.dat", 0).unwrap();
        assert_eq!(block.tx_count, 253);
        assert_eq!(block.transactions.len(), 253);
    }
}
