//! Booking error types.

use common::Pnr;
use domain::DomainError;
use thiserror::Error;

use crate::store::StoreError;

/// Hard errors surfaced to the caller.
///
/// Inventory trouble is never an error at this level; the orchestrator
/// normalizes it into [`crate::BookingOutcome::Failed`]. Only malformed
/// input, unknown PNRs, and store failures propagate as errors.
#[derive(Debug, Error)]
pub enum BookingError {
    /// The request failed validation before any remote call.
    #[error(transparent)]
    Validation(#[from] DomainError),

    /// No booking exists under the given confirmation code.
    #[error("Booking not found: {0}")]
    NotFound(Pnr),

    /// The booking store failed.
    #[error("Booking store error: {0}")]
    Store(#[from] StoreError),
}
