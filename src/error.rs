use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced at the boundaries of the hasher. The gate network itself is total.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Input that can't be turned into bytes (e.g. malformed hex).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// `update` was called on an instance that already produced its digest.
    #[error("hasher already finalized, call reset() before writing more data")]
    Finalized,

    /// Total input no longer fits the 64-bit length-in-bits padding field.
    #[error("length overflow: already wrote {written} bytes, trying to write {adding} bytes")]
    LengthOverflow {
        /// Bytes absorbed so far.
        written: u64,
        /// Bytes in the rejected call.
        adding: u64,
    },

    /// A byte slice of the wrong width was handed to a fixed-width type.
    #[error("wrong width: expected {expected} bytes, got {actual}")]
    Width {
        /// Required width in bytes.
        expected: usize,
        /// Width that was supplied.
        actual: usize,
    },

    /// The inverse path was asked to run without a usable encoding chain.
    #[error("encoding chain: {0}")]
    Chain(String),

    /// Recovered bytes do not end with well-formed length padding.
    #[error("malformed padding: {0}")]
    Padding(String),
}
