use thiserror::Error;

/// Closed set of error kinds produced by the reader, validator, recovery,
/// parser, and walker. Field-level kinds are only ever raised once the
/// matching recovery heuristic (if any) has already failed.
#[derive(Error, Debug)]
pub enum BlkError {
    #[error("unexpected end of file after {consumed} bytes")]
    UnexpectedEof { consumed: u64 },

    #[error("bad magic number: {0:#010x}")]
    BadMagic(u32),

    #[error("bad block length: {0}")]
    BadBlockLength(u32),

    #[error("bad header version: {0}")]
    BadHeaderVersion(u32),

    #[error("bad timestamp: {0}")]
    BadTimestamp(u32),

    #[error("bad transaction version: {0}")]
    BadTxVersion(u32),

    #[error("bad transaction index: {0}")]
    BadTxIndex(u32),

    #[error("bad sequence number bytes: {0:02x?}")]
    BadSequence([u8; 4]),

    #[error("bad output value: {0}")]
    BadOutputValue(u64),

    #[error("bad locktime: {0:#010x}")]
    BadLocktime(u32),

    #[error("block consumed {consumed} bytes, exceeding declared length {declared}")]
    BlockLengthExceeded { consumed: u64, declared: u64 },

    #[error("multisig-shaped script could not be unpacked")]
    MultiSigUnparseable,

    #[error("output script had zero length")]
    ZeroLengthOutputScript,

    #[error("duplicate chain index key {0}")]
    DuplicateIndexKey(String),

    #[error("walk could not resolve predecessor of {0}: {1}")]
    WalkReplacementFailed(String, String),

    #[error("config error: {0}")]
    Config(String),

    #[error("resolver error: {0}")]
    Resolver(String),

    #[error("csv error: {0}")]
    Csv(String),
}

pub type BlkResult<T> = Result<T, BlkError>;
