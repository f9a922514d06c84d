//! Error types for ratelimit

use thiserror::Error;

/// Result type alias for ratelimit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Limiter misconfiguration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The window must span some time
    #[error("Window size must be greater than zero")]
    ZeroWindow,

    /// At least one message per window must be allowed
    #[error("Max requests must be greater than 0")]
    ZeroRequests,
}
