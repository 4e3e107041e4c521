use blk_types::{BlkError, BlkResult, Hash32, RawField};
use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;

/// Streaming positional reader over one block file. Owns the in-block byte
/// counter `bc` directly (no process-global state, see DESIGN.md). Generic
/// over the underlying stream so tests can drive it with an in-memory
/// `Cursor` instead of a real file.
pub struct ByteReader<S = File> {
    stream: S,
    bc: u64,
}

impl ByteReader<File> {
    pub fn open(path: &Path) -> std::io::Result<Self> {
        Ok(Self {
            stream: File::open(path)?,
            bc: 0,
        })
    }

    pub fn from_file(file: File) -> Self {
        Self { stream: file, bc: 0 }
    }
}

impl ByteReader<Cursor<Vec<u8>>> {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            stream: Cursor::new(bytes),
            bc: 0,
        }
    }
}

impl<S: Read + Seek> ByteReader<S> {
    pub fn reset_block_counter(&mut self) {
        self.bc = 0;
    }

    pub fn bytes_consumed(&self) -> u64 {
        self.bc
    }

    pub fn tell(&mut self) -> BlkResult<u64> {
        self.stream
            .stream_position()
            .map_err(|_| BlkError::UnexpectedEof { consumed: self.bc })
    }

    pub fn take(&mut self, n: usize) -> BlkResult<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.stream
            .read_exact(&mut buf)
            .map_err(|_| BlkError::UnexpectedEof { consumed: self.bc })?;
        self.bc += n as u64;
        Ok(buf)
    }

    pub fn u16_le(&mut self) -> BlkResult<RawField<u16>> {
        let raw = self.take(2)?;
        let value = u16::from_le_bytes(raw.as_slice().try_into().unwrap());
        Ok(RawField::new(value, raw))
    }

    pub fn u32_le(&mut self) -> BlkResult<RawField<u32>> {
        let raw = self.take(4)?;
        let value = u32::from_le_bytes(raw.as_slice().try_into().unwrap());
        Ok(RawField::new(value, raw))
    }

    pub fn u64_le(&mut self) -> BlkResult<RawField<u64>> {
        let raw = self.take(8)?;
        let value = u64::from_le_bytes(raw.as_slice().try_into().unwrap());
        Ok(RawField::new(value, raw))
    }

    pub fn u16_be(&mut self) -> BlkResult<RawField<u16>> {
        let raw = self.take(2)?;
        let value = u16::from_be_bytes(raw.as_slice().try_into().unwrap());
        Ok(RawField::new(value, raw))
    }

    pub fn u32_be(&mut self) -> BlkResult<RawField<u32>> {
        let raw = self.take(4)?;
        let value = u32::from_be_bytes(raw.as_slice().try_into().unwrap());
        Ok(RawField::new(value, raw))
    }

    pub fn u64_be(&mut self) -> BlkResult<RawField<u64>> {
        let raw = self.take(8)?;
        let value = u64::from_be_bytes(raw.as_slice().try_into().unwrap());
        Ok(RawField::new(value, raw))
    }

    /// A 32-byte hash exactly as it appears on disk (little-endian value).
    pub fn hash32(&mut self) -> BlkResult<RawField<Hash32>> {
        let raw = self.take(32)?;
        let arr: [u8; 32] = raw.as_slice().try_into().unwrap();
        Ok(RawField::new(Hash32(arr), raw))
    }

    /// Bitcoin var-int: tag `<0xFD` is the value itself; `0xFD`/`0xFE`/`0xFF`
    /// introduce a 2/4/8-byte little-endian value. Returns the raw tag+body
    /// bytes too, so the transaction hash pre-image can be reproduced exactly.
    pub fn varint(&mut self) -> BlkResult<RawField<u64>> {
        let tag = self.take(1)?;
        match tag[0] {
            t @ 0x00..=0xFC => Ok(RawField::new(t as u64, tag)),
            0xFD => {
                let body = self.take(2)?;
                let value = u16::from_le_bytes(body.as_slice().try_into().unwrap()) as u64;
                let mut raw = tag;
                raw.extend(body);
                Ok(RawField::new(value, raw))
            }
            0xFE => {
                let body = self.take(4)?;
                let value = u32::from_le_bytes(body.as_slice().try_into().unwrap()) as u64;
                let mut raw = tag;
                raw.extend(body);
                Ok(RawField::new(value, raw))
            }
            0xFF => {
                let body = self.take(8)?;
                let value = u64::from_le_bytes(body.as_slice().try_into().unwrap());
                let mut raw = tag;
                raw.extend(body);
                Ok(RawField::new(value, raw))
            }
        }
    }

    /// Big-endian var-int reader used only by the `InputCount == 0` recovery
    /// heuristic, which tolerates a known encoder bug.
    pub fn varint_be(&mut self) -> BlkResult<RawField<u64>> {
        let tag = self.take(1)?;
        match tag[0] {
            t @ 0x00..=0xFC => Ok(RawField::new(t as u64, tag)),
            0xFD => {
                let body = self.take(2)?;
                let value = u16::from_be_bytes(body.as_slice().try_into().unwrap()) as u64;
                let mut raw = tag;
                raw.extend(body);
                Ok(RawField::new(value, raw))
            }
            0xFE => {
                let body = self.take(4)?;
                let value = u32::from_be_bytes(body.as_slice().try_into().unwrap()) as u64;
                let mut raw = tag;
                raw.extend(body);
                Ok(RawField::new(value, raw))
            }
            0xFF => {
                let body = self.take(8)?;
                let value = u64::from_be_bytes(body.as_slice().try_into().unwrap());
                let mut raw = tag;
                raw.extend(body);
                Ok(RawField::new(value, raw))
            }
        }
    }

    pub fn step_back(&mut self, n: u64) -> BlkResult<()> {
        self.stream
            .seek(SeekFrom::Current(-(n as i64)))
            .map_err(|_| BlkError::UnexpectedEof { consumed: self.bc })?;
        self.bc = self.bc.saturating_sub(n);
        Ok(())
    }

    pub fn seek_abs(&mut self, offset: u64) -> BlkResult<()> {
        self.stream
            .seek(SeekFrom::Start(offset))
            .map_err(|_| BlkError::UnexpectedEof { consumed: self.bc })?;
        Ok(())
    }

    /// Advance until `bc == block_length`, returning the skipped bytes.
    pub fn skip_to_end_of_block(&mut self, block_length: u64) -> BlkResult<Vec<u8>> {
        if self.bc > block_length {
            return Err(BlkError::BlockLengthExceeded {
                consumed: self.bc,
                declared: block_length,
            });
        }
        let remaining = (block_length - self.bc) as usize;
        self.take(remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varint_single_byte() {
        let mut r = ByteReader::from_bytes(vec![0x05]);
        let v = r.varint().unwrap();
        assert_eq!(v.value, 5);
        assert_eq!(v.raw, vec![0x05]);
    }

    #[test]
    fn varint_0xfd_boundary() {
        let mut r = ByteReader::from_bytes(vec![0xFD, 0xFD, 0x00]);
        let v = r.varint().unwrap();
        assert_eq!(v.value, 253);
        assert_eq!(v.raw, vec![0xFD, 0xFD, 0x00]);
    }

    #[test]
    fn varint_0xfe_and_0xff() {
        let mut r = ByteReader::from_bytes(vec![0xFE, 0x01, 0x00, 0x00, 0x00]);
        assert_eq!(r.varint().unwrap().value, 1);

        let mut r =
            ByteReader::from_bytes(vec![0xFF, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
        assert_eq!(r.varint().unwrap().value, 1);
    }

    #[test]
    fn take_past_eof_errors() {
        let mut r = ByteReader::from_bytes(vec![0x01, 0x02]);
        assert!(r.take(10).is_err());
    }

    #[test]
    fn step_back_rewinds_counter() {
        let mut r = ByteReader::from_bytes(vec![1, 2, 3, 4]);
        r.take(4).unwrap();
        assert_eq!(r.bytes_consumed(), 4);
        r.step_back(2).unwrap();
        assert_eq!(r.bytes_consumed(), 2);
        let raw = r.take(2).unwrap();
        assert_eq!(raw, vec![3, 4]);
    }
}
