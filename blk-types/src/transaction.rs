use crate::hash::Hash32;
use crate::keytype::KeyType;
use crate::raw::RawField;
use serde::{Deserialize, Serialize};

/// A Base58Check address derived from an output's challenge script, plus the
/// material it was derived from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub address: String,
    pub public_key: Option<String>,
    pub hash160: [u8; 20],
}

#[derive(Clone, Debug)]
pub struct Input {
    pub prev_tx_hash: RawField<Hash32>,
    pub prev_out_index: RawField<u32>,
    pub script_len: RawField<u64>,
    pub script: Vec<u8>,
    pub sequence: RawField<u32>,
}

impl Input {
    /// `true` when this is the coinbase input (all-zero prev tx, index 0xFFFFFFFF).
    pub fn is_coinbase(&self) -> bool {
        self.prev_tx_hash.value == Hash32::ZERO && self.prev_out_index.value == 0xFFFF_FFFF
    }

    pub fn raw_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.prev_tx_hash.raw);
        out.extend_from_slice(&self.prev_out_index.raw);
        out.extend_from_slice(&self.script_len.raw);
        out.extend_from_slice(&self.script);
        out.extend_from_slice(&self.sequence.raw);
        out
    }
}

#[derive(Clone, Debug)]
pub struct Output {
    pub value: RawField<u64>,
    pub script_len: RawField<u64>,
    pub script: Vec<u8>,
    pub key_type: KeyType,
    pub addresses: Vec<Address>,
}

impl Output {
    pub fn raw_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.value.raw);
        out.extend_from_slice(&self.script_len.raw);
        out.extend_from_slice(&self.script);
        out
    }
}

#[derive(Clone, Debug)]
pub struct Transaction {
    pub version: RawField<u32>,
    pub input_count: RawField<u64>,
    pub inputs: Vec<Input>,
    pub output_count: RawField<u64>,
    pub outputs: Vec<Output>,
    pub locktime: RawField<u32>,
    pub tx_hash: Hash32,
}

impl Transaction {
    /// The exact pre-image `version ‖ varintRaw(|in|) ‖ Σ inputs ‖ varintRaw(|out|) ‖ Σ outputs ‖ locktime`.
    pub fn raw_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.version.raw);
        out.extend_from_slice(&self.input_count.raw);
        for input in &self.inputs {
            out.extend_from_slice(&input.raw_bytes());
        }
        out.extend_from_slice(&self.output_count.raw);
        for output in &self.outputs {
            out.extend_from_slice(&output.raw_bytes());
        }
        out.extend_from_slice(&self.locktime.raw);
        out
    }
}
