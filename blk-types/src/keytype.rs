use serde::{Deserialize, Serialize};

pub const MAX_MULTISIG_SLOTS: usize = 10;

/// One extracted public key within a multisig output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultisigSlot {
    pub pubkey: Vec<u8>,
    pub compressed: bool,
}

/// The closed set of output-script shapes the classifier recognizes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyType {
    UncompressedPublicKey { pubkey: [u8; 65] },
    CompressedPublicKey { pubkey: [u8; 33] },
    TruncatedCompressedKey { payload: [u8; 32] },
    ScriptHash { hash160: [u8; 20] },
    RipeMd160 { hash160: [u8; 20] },
    Stealth { payload: [u8; 39] },
    Multisig { slots: Vec<MultisigSlot> },
    Null,
}

impl KeyType {
    pub fn name(&self) -> &'static str {
        match self {
            KeyType::UncompressedPublicKey { .. } => "UNCOMPRESSED_PUBLIC_KEY",
            KeyType::CompressedPublicKey { .. } => "COMPRESSED_PUBLIC_KEY",
            KeyType::TruncatedCompressedKey { .. } => "TRUNCATED_COMPRESSED_KEY",
            KeyType::ScriptHash { .. } => "SCRIPT_HASH",
            KeyType::RipeMd160 { .. } => "RIPEMD160",
            KeyType::Stealth { .. } => "STEALTH",
            KeyType::Multisig { .. } => "MULTISIG",
            KeyType::Null => "NULL",
        }
    }
}
