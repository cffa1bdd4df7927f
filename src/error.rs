//! Error types for the approval chain.

use thiserror::Error;

/// Result type alias using the caregate error type.
pub type Result<T> = std::result::Result<T, CaregateError>;

/// Main error type for the approval chain.
///
/// A business denial is never represented here. Denials live on the request
/// itself as a rejection reason; these variants cover malformed input and
/// misconfiguration only.
#[derive(Error, Debug)]
pub enum CaregateError {
    /// Validation error (e.g., missing description, unparsable amount, unknown request type)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The chain could not be assembled from the supplied tiers
    #[error("Invalid chain: {0}")]
    InvalidChain(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// General error from anyhow
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CaregateError {
    /// Shorthand for building a [`CaregateError::ValidationError`].
    pub fn validation(message: impl Into<String>) -> Self {
        CaregateError::ValidationError(message.into())
    }

    /// Returns true if this error was caused by bad caller input rather than configuration.
    pub fn is_validation(&self) -> bool {
        matches!(self, CaregateError::ValidationError(_))
    }
}
