pub mod classifier;
pub mod csv_out;
pub mod index;
pub mod parser;
pub mod reader;
pub mod recovery;
pub mod validator;
pub mod walker;

pub use index::{ChainIndex, SharedChainIndex};
pub use parser::{parse_block, ParserConfig};
pub use reader::ByteReader;
pub use walker::{walk_main_chain, GapFill, NullResolver, ResolveByHash, ResolverError, WalkRecord};
