//! Error types for rangecache

use thiserror::Error;

/// Result type alias for rangecache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised when a caller breaks the cache or query contract
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A cache must be able to hold at least one entry
    #[error("Capacity must be greater than 0")]
    ZeroCapacity,

    /// Range bounds are reversed
    #[error("Invalid range: left {left} is greater than right {right}")]
    InvalidRange {
        /// Left (inclusive) bound
        left: usize,
        /// Right (inclusive) bound
        right: usize,
    },

    /// Index lies outside the array
    #[error("Index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds {
        /// Offending index
        index: usize,
        /// Length of the array
        len: usize,
    },

    /// Sum does not fit into an i64
    #[error("Sum over [{left}, {right}] overflows i64")]
    Overflow {
        /// Left (inclusive) bound
        left: usize,
        /// Right (inclusive) bound
        right: usize,
    },
}
