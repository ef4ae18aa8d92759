use std::io;

use thiserror::Error;

pub type PrismResult<T> = std::result::Result<T, PrismError>;

#[derive(Error, Debug)]
pub enum PrismError {
    #[error("The table was generated with {field} = {found}, but the current configuration uses {expected}")]
    ConfigMismatch {
        field: &'static str,
        expected: String,
        found: String,
    },

    #[error("Failed to read the rainbow table. Is the file corrupted? ({0})")]
    CorruptStore(String),

    #[error("Unsupported rainbow table format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(
        "Unable to access the file at the given path. Make sure the right permissions are available"
    )]
    Io(#[from] io::Error),

    #[error("Failed to serialize the rainbow table")]
    Serialize,

    #[error("Only search spaces up to 2^64 are supported, but the provided space is 2^{0}")]
    Space(u8),

    #[error("The password length should be between 1 and {0}")]
    PasswordLength(u8),

    #[error("Invalid charset: {0}")]
    Charset(&'static str),

    #[error("The chain length should be at least 1")]
    ChainLength,

    #[error("The {backend} backend disagrees with the reference computation for the chain starting at {startpoint}")]
    BackendMismatch {
        backend: &'static str,
        startpoint: String,
    },

    #[error("The table generation thread panicked")]
    WorkerPanicked,
}
