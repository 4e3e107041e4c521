//! Heuristics invoked when a Validator predicate fails mid-parse (§4.3).
//! Each is tried at most once per field; on failure the caller surfaces the
//! matching typed error rather than retrying further.

use crate::reader::ByteReader;
use crate::validator::is_valid_magic;
use blk_types::{BlkError, BlkResult, RawField};
use std::io::{Read, Seek};

/// Advance 4-byte-aligned until an accepted magic is found. On success the
/// found magic is treated as the start of the next block.
pub fn look_for_magic<S: Read + Seek>(reader: &mut ByteReader<S>) -> BlkResult<RawField<u32>> {
    const MAX_SCAN_WORDS: usize = 1 << 20;
    for _ in 0..MAX_SCAN_WORDS {
        let candidate = reader.u32_le()?;
        if is_valid_magic(candidate.value) {
            return Ok(candidate);
        }
    }
    Err(BlkError::BadMagic(0))
}

/// A u32 that appears to have been padded into a wider field: step back 4
/// bytes, read 3 data bytes plus one zero pad byte, decode as u32 LE.
pub fn rewind_and_read32<S: Read + Seek>(reader: &mut ByteReader<S>) -> BlkResult<RawField<u32>> {
    reader.step_back(4)?;
    let mut raw = reader.take(3)?;
    raw.push(0);
    let value = u32::from_le_bytes(raw.as_slice().try_into().unwrap());
    Ok(RawField::new(value, raw))
}

/// Symmetric for u64 (3 bytes of real data, 5 bytes of pad).
pub fn rewind_and_read64<S: Read + Seek>(reader: &mut ByteReader<S>) -> BlkResult<RawField<u64>> {
    reader.step_back(8)?;
    let mut raw = reader.take(3)?;
    raw.extend_from_slice(&[0u8; 5]);
    let value = u64::from_le_bytes(raw.as_slice().try_into().unwrap());
    Ok(RawField::new(value, raw))
}

/// Used for `sequenceNumber` and `locktime`: step back 5 bytes to skip a
/// spurious extra byte, then re-read 4 bytes LE.
pub fn step_back5_reread4<S: Read + Seek>(reader: &mut ByteReader<S>) -> BlkResult<RawField<u32>> {
    reader.step_back(5)?;
    reader.u32_le()
}

/// `TransactionVersion == 0x01000000`: the version was misread with a
/// leading spurious byte; step back 5 bytes and re-read as u32 LE.
pub fn reread_tx_version<S: Read + Seek>(reader: &mut ByteReader<S>) -> BlkResult<RawField<u32>> {
    step_back5_reread4(reader)
}

/// `InputCount == 0`: skip 32 bytes (a misaligned prev-tx-hash-shaped read),
/// then read a big-endian var-int, tolerating a known encoder bug.
pub fn input_count_zero_recover<S: Read + Seek>(
    reader: &mut ByteReader<S>,
) -> BlkResult<RawField<u64>> {
    reader.take(32)?;
    reader.varint_be()
}
