//! Error types for ReelDrive

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum RdError {
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Outcome transport error: {0}")]
    OutcomeTransport(String),

    #[error("Outcome rejected: {0}")]
    OutcomeRejected(String),

    #[error("Game paused while outcome was in flight")]
    OutcomePaused,

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias
pub type RdResult<T> = Result<T, RdError>;
