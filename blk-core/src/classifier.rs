//! Ordered pattern matcher over challenge (output) scripts (§4.5).

use blk_types::{Address, KeyType, MultisigSlot, MAX_MULTISIG_SLOTS};

const OP_RETURN: u8 = 0x6A;
const OP_DUP: u8 = 0x76;
const OP_EQUAL: u8 = 0x87;
const OP_EQUALVERIFY: u8 = 0x88;
const OP_HASH160: u8 = 0xA9;
const OP_CHECKSIG: u8 = 0xAC;
const OP_CHECKMULTISIG: u8 = 0xAE;
const OP_1: u8 = 0x51;
const OP_5: u8 = 0x55;

/// Classify a challenge script into the closed `KeyType` set. Pure function:
/// no hashing, no I/O. The first matching pattern wins.
pub fn classify(script: &[u8]) -> KeyType {
    if script.is_empty() {
        return KeyType::Null;
    }

    if script.len() == 67 && script[0] == 0x41 && script[66] == OP_CHECKSIG {
        let mut pubkey = [0u8; 65];
        pubkey.copy_from_slice(&script[1..66]);
        return KeyType::UncompressedPublicKey { pubkey };
    }
    if script.len() == 66 && script[65] == OP_CHECKSIG {
        let mut pubkey = [0u8; 65];
        pubkey.copy_from_slice(&script[0..65]);
        return KeyType::UncompressedPublicKey { pubkey };
    }
    if script.len() == 35 && script[0] == 0x21 && script[34] == OP_CHECKSIG {
        let mut pubkey = [0u8; 33];
        pubkey.copy_from_slice(&script[1..34]);
        return KeyType::CompressedPublicKey { pubkey };
    }
    if script.len() == 33 && script[0] == 0x20 {
        let mut payload = [0u8; 32];
        payload.copy_from_slice(&script[1..33]);
        return KeyType::TruncatedCompressedKey { payload };
    }
    if script.len() == 23 && script[0] == OP_HASH160 && script[1] == 0x14 && script[22] == OP_EQUAL
    {
        let mut hash160 = [0u8; 20];
        hash160.copy_from_slice(&script[2..22]);
        return KeyType::ScriptHash { hash160 };
    }
    if script.len() == 25
        && script[0] == OP_DUP
        && script[1] == OP_HASH160
        && script[2] == 0x14
        && script[23] == OP_EQUALVERIFY
        && script[24] == OP_CHECKSIG
    {
        let mut hash160 = [0u8; 20];
        hash160.copy_from_slice(&script[3..23]);
        return KeyType::RipeMd160 { hash160 };
    }
    if script.len() == 40 && script[0] == OP_RETURN {
        let mut payload = [0u8; 39];
        payload.copy_from_slice(&script[1..40]);
        return KeyType::Stealth { payload };
    }
    if let Some(multisig) = try_classify_multisig(script) {
        return multisig;
    }
    if let Some(hash160) = scan_for_p2pkh_substring(script) {
        return KeyType::RipeMd160 { hash160 };
    }
    KeyType::Null
}

fn try_classify_multisig(script: &[u8]) -> Option<KeyType> {
    if script.len() < 2 {
        return None;
    }
    let m_op = script[0];
    if !(OP_1..=OP_5).contains(&m_op) {
        return None;
    }
    if *script.last()? != OP_CHECKMULTISIG {
        return None;
    }
    let n_op = script[script.len() - 2];
    if !(OP_1..=OP_5).contains(&n_op) {
        return None;
    }

    let mut slots = Vec::new();
    let mut i = 1usize;
    let end = script.len() - 2;
    while i < end {
        match script[i] {
            0x21 if i + 34 <= end => {
                slots.push(MultisigSlot {
                    pubkey: script[i + 1..i + 34].to_vec(),
                    compressed: true,
                });
                i += 34;
            }
            0x41 if i + 66 <= end => {
                slots.push(MultisigSlot {
                    pubkey: script[i + 1..i + 66].to_vec(),
                    compressed: false,
                });
                i += 66;
            }
            _ => return None,
        }
        if slots.len() > MAX_MULTISIG_SLOTS {
            return None;
        }
    }
    if slots.is_empty() {
        return None;
    }
    Some(KeyType::Multisig { slots })
}

fn scan_for_p2pkh_substring(script: &[u8]) -> Option<[u8; 20]> {
    if script.len() < 25 {
        return None;
    }
    for window_start in 0..=(script.len() - 25) {
        let w = &script[window_start..window_start + 25];
        if w[0] == OP_DUP
            && w[1] == OP_HASH160
            && w[2] == 0x14
            && w[23] == OP_EQUALVERIFY
            && w[24] == OP_CHECKSIG
        {
            let mut hash160 = [0u8; 20];
            hash160.copy_from_slice(&w[3..23]);
            return Some(hash160);
        }
    }
    None
}

/// Derive the addresses for a classified key type. `hash160-bearing` types
/// derive directly; public-key types are hashed first.
pub fn derive_addresses(key_type: &KeyType) -> Vec<Address> {
    const P2PKH_VERSION: u8 = 0x00;
    const P2SH_VERSION: u8 = 0x05;

    match key_type {
        KeyType::UncompressedPublicKey { pubkey } => {
            let hash160 = blk_hashing::hash160(pubkey);
            vec![Address {
                address: blk_hashing::hash160_to_address(&hash160, P2PKH_VERSION),
                public_key: Some(hex::encode(pubkey)),
                hash160,
            }]
        }
        KeyType::CompressedPublicKey { pubkey } => {
            let hash160 = blk_hashing::hash160(pubkey);
            vec![Address {
                address: blk_hashing::hash160_to_address(&hash160, P2PKH_VERSION),
                public_key: Some(hex::encode(pubkey)),
                hash160,
            }]
        }
        KeyType::TruncatedCompressedKey { payload } => {
            let mut pubkey = Vec::with_capacity(33);
            pubkey.push(0x02);
            pubkey.extend_from_slice(payload);
            let hash160 = blk_hashing::hash160(&pubkey);
            vec![Address {
                address: blk_hashing::hash160_to_address(&hash160, P2PKH_VERSION),
                public_key: Some(hex::encode(&pubkey)),
                hash160,
            }]
        }
        KeyType::ScriptHash { hash160 } => vec![Address {
            address: blk_hashing::hash160_to_address(hash160, P2SH_VERSION),
            public_key: None,
            hash160: *hash160,
        }],
        KeyType::RipeMd160 { hash160 } => vec![Address {
            address: blk_hashing::hash160_to_address(hash160, P2PKH_VERSION),
            public_key: None,
            hash160: *hash160,
        }],
        KeyType::Stealth { .. } | KeyType::Null => Vec::new(),
        KeyType::Multisig { slots } => slots
            .iter()
            .map(|slot| {
                let hash160 = blk_hashing::hash160(&slot.pubkey);
                Address {
                    address: blk_hashing::hash160_to_address(&hash160, P2PKH_VERSION),
                    public_key: Some(hex::encode(&slot.pubkey)),
                    hash160,
                }
            })
            .collect(),
    }
}
