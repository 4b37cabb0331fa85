//! Remote flight-inventory access with circuit-breaker protection.
//!
//! The raw [`RemoteInventoryClient`] makes point-to-point calls and may
//! fail at the transport level. The [`InventoryGateway`] wraps each
//! operation with a per-operation [`CircuitBreaker`], a bounded timeout,
//! and a degraded fallback result, so callers above it never see a
//! transport error.

pub mod availability;
pub mod breaker;
pub mod client;
pub mod gateway;

pub use availability::{FlightAvailability, ReservationOutcome, ReservationResult};
pub use breaker::{BreakerConfig, CircuitBreaker, CircuitState};
pub use client::{InMemoryInventoryClient, InventoryError, RemoteInventoryClient};
pub use gateway::{GatewayConfig, InventoryGateway};
