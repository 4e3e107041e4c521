use serde::de::{self, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 256-bit hash stored in its on-disk byte order (little-endian value).
///
/// Conversion to the conventional human-readable ("display form", most
/// significant byte first) happens only at the edges: CSV emission, address
/// derivation inputs that were themselves given in display form, and the
/// genesis sentinel comparison.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash32(pub [u8; 32]);

impl Hash32 {
    pub const ZERO: Hash32 = Hash32([0u8; 32]);

    pub fn from_display_hex(hex_str: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes: [u8; 32] = {
            let v = hex::decode(hex_str)?;
            v.try_into().map_err(|_| hex::FromHexError::InvalidStringLength)?
        };
        bytes.reverse();
        Ok(Hash32(bytes))
    }

    /// Reverses internal (little-endian) byte order into display form.
    pub fn display_hex(&self) -> String {
        let mut reversed = self.0;
        reversed.reverse();
        hex::encode(reversed)
    }

    pub fn raw_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn compressed(&self) -> CompressedHash {
        let mut reversed = self.0;
        reversed.reverse();
        let mut low16 = [0u8; 16];
        low16.copy_from_slice(&reversed[16..32]);
        CompressedHash(low16)
    }
}

impl fmt::Debug for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash32({})", self.display_hex())
    }
}

impl fmt::Display for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_hex())
    }
}

impl From<[u8; 32]> for Hash32 {
    fn from(bytes: [u8; 32]) -> Self {
        Hash32(bytes)
    }
}

impl Serialize for Hash32 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.display_hex())
    }
}

impl<'de> Deserialize<'de> for Hash32 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct HexVisitor;

        impl<'de> Visitor<'de> for HexVisitor {
            type Value = Hash32;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a 64-character hex string in display form")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Hash32::from_display_hex(v).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(HexVisitor)
    }
}

/// The low 16 bytes of a block hash's display form; the Chain Index key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompressedHash(pub [u8; 16]);

impl CompressedHash {
    pub fn hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for CompressedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompressedHash({})", self.hex())
    }
}

impl Serialize for CompressedHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.hex())
    }
}

impl<'de> Deserialize<'de> for CompressedHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s: String = serde::Deserialize::deserialize(deserializer)?;
        let bytes = hex::decode(s).map_err(serde::de::Error::custom)?;
        let arr: [u8; 16] = bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("compressed hash must be 16 bytes"))?;
        Ok(CompressedHash(arr))
    }
}

impl fmt::Display for CompressedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex())
    }
}

/// Compressed hash of the real mainnet genesis block
/// (`000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f`),
/// used as the walker's termination sentinel. See DESIGN.md open question (a).
pub const GENESIS_SENTINEL: CompressedHash = CompressedHash([
    0x4f, 0xf7, 0x63, 0xae, 0x46, 0xa2, 0xa6, 0xc1, 0x72, 0xb3, 0xf1, 0xb6, 0x0a, 0x8c, 0xe2, 0x6f,
]);

pub const GENESIS_DISPLAY_HEX: &str =
    "000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_sentinel_matches_known_hash() {
        let h = Hash32::from_display_hex(GENESIS_DISPLAY_HEX).unwrap();
        assert_eq!(h.compressed(), GENESIS_SENTINEL);
    }

    #[test]
    fn reverse_endian_is_involutive() {
        let h = Hash32([7u8; 32]);
        let back = Hash32::from_display_hex(&h.display_hex()).unwrap();
        assert_eq!(h, back);
    }

    #[test]
    fn compressed_matches_display_low_bytes() {
        let h = Hash32([0u8; 32]);
        assert_eq!(h.compressed().0, [0u8; 16]);
    }

    #[test]
    fn serializes_as_display_hex_json_string() {
        let h = Hash32::from_display_hex(GENESIS_DISPLAY_HEX).unwrap();
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, format!("\"{GENESIS_DISPLAY_HEX}\""));
        let back: Hash32 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
    }
}
