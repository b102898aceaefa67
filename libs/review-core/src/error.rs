//! Error types for review-core.

use thiserror::Error;

/// Result type alias using ReviewError.
pub type Result<T> = std::result::Result<T, ReviewError>;

/// Errors surfaced by the review engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    /// Caller-supplied input or collaborator-supplied state violated an
    /// invariant. Rejected before computation, never clamped.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from the backing review/mistake stores.
///
/// `NotConfigured` and `Unavailable` are deliberately distinct so a
/// caller can degrade to an empty result for the former and alert on
/// the latter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("store not configured")]
    NotConfigured,

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("concurrent update conflict on {0}")]
    Conflict(String),
}
