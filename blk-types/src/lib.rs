pub mod block;
pub mod error;
pub mod hash;
pub mod header;
pub mod keytype;
pub mod raw;
pub mod summary;
pub mod transaction;

pub use block::Block;
pub use error::{BlkError, BlkResult};
pub use hash::{CompressedHash, Hash32, GENESIS_SENTINEL};
pub use header::Header;
pub use keytype::{KeyType, MultisigSlot, MAX_MULTISIG_SLOTS};
pub use raw::RawField;
pub use summary::BlockSummary;
pub use transaction::{Address, Input, Output, Transaction};
