pub mod base58;

use blk_types::Hash32;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// `SHA256(SHA256(bytes))`.
pub fn double_sha256(bytes: &[u8]) -> Hash32 {
    let first = Sha256::digest(bytes);
    let second = Sha256::digest(first);
    Hash32(second.into())
}

/// `RIPEMD160(SHA256(x))`, the 20-byte address fingerprint.
pub fn hash160(bytes: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(bytes);
    let ripe = Ripemd160::digest(sha);
    ripe.into()
}

/// `Base58(0x00 ‖ hash160 ‖ dSHA256(0x00 ‖ hash160)[0..4])` for a P2PKH-style address.
pub fn hash160_to_address(hash160: &[u8; 20], version_byte: u8) -> String {
    let mut payload = vec![version_byte];
    payload.extend_from_slice(hash160);
    base58::check_encode(&payload)
}

/// Derive a P2PKH-style address directly from a public key.
pub fn pubkey_to_address(pubkey: &[u8], version_byte: u8) -> String {
    hash160_to_address(&hash160(pubkey), version_byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_sha256_matches_known_vector() {
        // dSHA256("") = SHA256(SHA256(""))
        let h = double_sha256(b"");
        assert_eq!(
            h.raw_hex(),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
    }

    #[test]
    fn hash160_is_20_bytes() {
        let h = hash160(b"hello");
        assert_eq!(h.len(), 20);
    }

    #[test]
    fn p2pkh_address_begins_with_1() {
        let addr = pubkey_to_address(&[0x02u8; 33], 0x00);
        assert!(addr.starts_with('1'));
    }
}
