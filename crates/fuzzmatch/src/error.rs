//! Common error types for fuzzmatch host components.

use fuzzmatch_core::MatchError;
use thiserror::Error;

/// Common error type for fuzzmatch operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Matching engine error
    #[error(transparent)]
    Match(#[from] MatchError),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using fuzzmatch Error.
pub type Result<T> = std::result::Result<T, Error>;
