//! Matching error types

use thiserror::Error;

/// Errors that can occur while configuring or running the matcher.
///
/// A missing entity is not an error: lookups return `Option`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    /// Threshold, weight or scale outside its valid range
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Requested algorithm or encoder id is not registered
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Input longer than the configured cap (checked before any O(n*m) work)
    #[error("input too large: {len} chars exceeds limit of {limit}")]
    InputTooLarge { len: usize, limit: usize },

    /// Entity profile cannot be stored (e.g. empty id)
    #[error("invalid entity: {0}")]
    InvalidEntity(String),
}

/// Result type for matching operations
pub type Result<T> = std::result::Result<T, MatchError>;

impl MatchError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}

/// Fail with `InvalidConfiguration` unless `value` is a finite number in `[min, max]`.
pub(crate) fn check_range(name: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(MatchError::config(format!(
            "{name} must be in [{min}, {max}], got {value}"
        )))
    }
}
