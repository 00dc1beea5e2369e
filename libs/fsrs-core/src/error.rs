//! Error types for fsrs-core.

use thiserror::Error;

/// Result type alias using ConfigError.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while building a scheduler parameter set.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("expected {expected} weights, got {actual}")]
    WeightCount { expected: usize, actual: usize },

    #[error("weight w[{index}] is not finite: {value}")]
    NonFiniteWeight { index: usize, value: f64 },

    #[error("forgetting curve decay w[20] must be positive, got {0}")]
    Decay(f64),

    #[error("request retention must be strictly between 0 and 1, got {0}")]
    RequestRetention(f64),

    #[error("maximum interval must be at least 1 day, got {0}")]
    MaximumInterval(u32),
}

/// Caller contract violations detected at the API boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContractError {
    #[error("invalid rating: {0}")]
    InvalidRating(String),

    #[error("invalid card status: {0}")]
    InvalidStatus(String),

    #[error("difficulty out of range [1, 10]: {0}")]
    Difficulty(f64),

    #[error("stability must be positive: {0}")]
    Stability(f64),

    #[error("retrievability out of range [0, 1]: {0}")]
    Retrievability(f64),
}
