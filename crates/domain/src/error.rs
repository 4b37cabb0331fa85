//! Domain error types.

use thiserror::Error;

/// Errors raised by the domain model itself.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The booking request is structurally invalid. Raised before any
    /// remote call is made.
    #[error("Invalid booking request: {0}")]
    Validation(String),
}
