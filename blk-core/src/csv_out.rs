//! Main-chain CSV manifest reader/writer (§6). No header row; columns are
//! `blockHashHex, fileEndpoint, byteOffset, parsedBlockLength,
//! rawBlockNumber, timestamp`, in that order.

use crate::walker::WalkRecord;
use blk_types::{BlkError, BlkResult, Hash32};
use std::io::{Read, Write};

pub fn write_csv<W: Write>(writer: W, records: &[WalkRecord]) -> BlkResult<()> {
    let mut w = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    for record in records {
        w.write_record([
            record.block_hash.display_hex(),
            record.file_endpoint.clone(),
            record.byte_offset.to_string(),
            record.parsed_block_length.to_string(),
            record.raw_block_number.to_string(),
            record.timestamp.to_string(),
        ])
        .map_err(|e| BlkError::Csv(e.to_string()))?;
    }
    w.flush().map_err(|e| BlkError::Csv(e.to_string()))
}

/// One row loaded back from an existing manifest, for `map` mode
/// verification: re-open the referenced file at `byte_offset`, re-parse, and
/// check the recomputed hash matches `block_hash`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsvRow {
    pub block_hash: Hash32,
    pub file_endpoint: String,
    pub byte_offset: u64,
    pub parsed_block_length: u32,
    pub raw_block_number: u64,
    pub timestamp: u32,
}

pub fn read_csv<R: Read>(reader: R) -> BlkResult<Vec<CsvRow>> {
    let mut r = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(reader);
    let mut rows = Vec::new();
    for result in r.records() {
        let record = result.map_err(|e| BlkError::Csv(e.to_string()))?;
        if record.len() != 6 {
            return Err(BlkError::Csv(format!(
                "expected 6 columns, got {}",
                record.len()
            )));
        }
        let block_hash = Hash32::from_display_hex(&record[0])
            .map_err(|e| BlkError::Csv(format!("bad blockHashHex: {e}")))?;
        rows.push(CsvRow {
            block_hash,
            file_endpoint: record[1].to_string(),
            byte_offset: record[2]
                .parse()
                .map_err(|_| BlkError::Csv("bad byteOffset".to_string()))?,
            parsed_block_length: record[3]
                .parse()
                .map_err(|_| BlkError::Csv("bad parsedBlockLength".to_string()))?,
            raw_block_number: record[4]
                .parse()
                .map_err(|_| BlkError::Csv("bad rawBlockNumber".to_string()))?,
            timestamp: record[5]
                .parse()
                .map_err(|_| BlkError::Csv("bad timestamp".to_string()))?,
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_csv() {
        let records = vec![WalkRecord {
            block_hash: Hash32([9u8; 32]),
            file_endpoint: "blk00000.dat".to_string(),
            byte_offset: 8,
            parsed_block_length: 285,
            raw_block_number: 0,
            timestamp: 1_231_006_505,
        }];

        let mut buf = Vec::new();
        write_csv(&mut buf, &records).unwrap();

        let rows = read_csv(buf.as_slice()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].block_hash, records[0].block_hash);
        assert_eq!(rows[0].byte_offset, 8);
        assert_eq!(rows[0].parsed_block_length, 285);
    }

    #[test]
    fn no_header_row_emitted() {
        let records = vec![WalkRecord {
            block_hash: Hash32::ZERO,
            file_endpoint: "blk00000.dat".to_string(),
            byte_offset: 0,
            parsed_block_length: 0,
            raw_block_number: 0,
            timestamp: 0,
        }];
        let mut buf = Vec::new();
        write_csv(&mut buf, &records).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
