pub mod backend;
pub mod builder;
pub mod chain;
pub mod coverage;
pub mod cracker;
pub mod ctx;
pub mod error;
pub mod event;
pub mod hash;
mod ntlm;
pub mod password;
pub mod rainbow_chain_map;
pub mod rainbow_table;
pub mod reduce;
pub mod scheduling;
pub mod space;

pub use backend::{verify_equivalence, Backend, BackendKind, CpuBackend, LanesBackend, SequentialBackend};
pub use builder::TableBuilder;
pub use chain::{build_chain, ChainWalker, RainbowChain};
pub use coverage::{estimate_coverage, CoverageReport};
pub use cracker::Cracker;
pub use ctx::{RainbowTableCtx, RainbowTableCtxBuilder, TableMetadata};
pub use error::{PrismError, PrismResult};
pub use event::{Event, RainbowTableHandle};
pub use hash::{Digest, HashFunction};
pub use password::Password;
pub use rainbow_table::RainbowTable;
pub use reduce::{ReductionFamily, REDUCTION_VERSION};
pub use space::PasswordSpace;

/// The default chain length.
pub const DEFAULT_CHAIN_LENGTH: u64 = 256;

/// The default number of chains to generate.
pub const DEFAULT_CHAIN_COUNT: u64 = 10_000_000;

/// The default password length.
pub const DEFAULT_PASSWORD_LENGTH: u8 = 5;

/// The default charset.
pub const DEFAULT_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz123456";

/// The default number of chains computed per batch.
pub const DEFAULT_BATCH_SIZE: usize = 65_536;

/// The maximum password size allowed.
pub const MAX_PASSWORD_LENGTH_ALLOWED: usize = 10;

/// The maximum charset length allowed.
pub const MAX_CHARSET_LENGTH_ALLOWED: usize = 126;
