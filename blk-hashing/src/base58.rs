use num_bigint::BigUint;
use thiserror::Error;

const ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Base58Error {
    #[error("invalid base58 character {0:?}")]
    InvalidChar(char),
    #[error("checksum mismatch")]
    BadChecksum,
    #[error("payload too short for a checksum")]
    TooShort,
}

/// Plain Base58 over the Bitcoin alphabet (no `0OIl`), big-integer division
/// the same way the original Go `base58.go` drives `math/big`.
pub fn encode(bytes: &[u8]) -> String {
    let zero_count = bytes.iter().take_while(|&&b| b == 0).count();

    let mut value = BigUint::from_bytes_be(bytes);
    let base = BigUint::from(58u32);
    let zero = BigUint::from(0u32);
    let mut digits = Vec::new();

    if value == zero {
        digits.push(ALPHABET[0]);
    }

    while value > zero {
        let remainder = (&value % &base).to_u32_digits();
        let digit = remainder.first().copied().unwrap_or(0) as usize;
        digits.push(ALPHABET[digit]);
        value /= &base;
    }

    let mut out = vec![ALPHABET[0]; zero_count];
    out.extend(digits.into_iter().rev());
    String::from_utf8(out).expect("alphabet is ASCII")
}

pub fn decode(s: &str) -> Result<Vec<u8>, Base58Error> {
    let mut value = BigUint::from(0u32);
    let base = BigUint::from(58u32);

    let mut leading_zeros = 0usize;
    let mut seen_nonzero = false;

    for ch in s.chars() {
        let idx = ALPHABET
            .iter()
            .position(|&a| a as char == ch)
            .ok_or(Base58Error::InvalidChar(ch))?;
        if !seen_nonzero {
            if idx == 0 {
                leading_zeros += 1;
            } else {
                seen_nonzero = true;
            }
        }
        value = value * &base + BigUint::from(idx as u32);
    }

    let mut body = value.to_bytes_be();
    if body == [0u8] {
        body = Vec::new();
    }

    let mut out = vec![0u8; leading_zeros];
    out.extend(body);
    Ok(out)
}

/// `Base58(payload ‖ dSHA256(payload)[0..4])`.
pub fn check_encode(payload: &[u8]) -> String {
    let checksum = crate::double_sha256(payload);
    let mut full = payload.to_vec();
    full.extend_from_slice(&checksum.0[0..4]);
    encode(&full)
}

/// Inverse of `check_encode`: returns the payload (without the 4-byte checksum)
/// after verifying it.
pub fn check_decode(s: &str) -> Result<Vec<u8>, Base58Error> {
    let full = decode(s)?;
    if full.len() < 4 {
        return Err(Base58Error::TooShort);
    }
    let (payload, checksum) = full.split_at(full.len() - 4);
    let expected = crate::double_sha256(payload);
    if &expected.0[0..4] != checksum {
        return Err(Base58Error::BadChecksum);
    }
    Ok(payload.to_vec())
}
