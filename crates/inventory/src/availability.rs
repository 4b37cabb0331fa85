//! Payload types returned by the inventory service.

use std::collections::BTreeSet;

use common::{FlightId, SeatNumber};
use domain::Money;
use serde::{Deserialize, Serialize};

/// Availability snapshot for one flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightAvailability {
    pub flight_id: FlightId,
    /// Seats currently free on the flight.
    pub available_seats: BTreeSet<SeatNumber>,
    /// Price per seat.
    pub seat_price: Money,
    /// Journey start as reported by the remote service, unparsed.
    /// Absent or unparseable values are tolerated downstream.
    pub start_date: Option<String>,
    /// True when this is fallback data substituted for an unreachable
    /// service, rather than a real snapshot.
    pub degraded: bool,
}

impl FlightAvailability {
    /// Fallback snapshot: no seats, zero price, no journey date.
    pub fn degraded(flight_id: FlightId) -> Self {
        Self {
            flight_id,
            available_seats: BTreeSet::new(),
            seat_price: Money::zero(),
            start_date: None,
            degraded: true,
        }
    }

    /// Returns true if every requested seat is currently free.
    pub fn contains_all(&self, seats: &[SeatNumber]) -> bool {
        seats.iter().all(|s| self.available_seats.contains(s))
    }
}

/// Outcome of a reserve or release call.
///
/// For release calls, `Reserved` means the release was acknowledged by
/// the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationOutcome {
    /// The remote service holds (or released) the seats.
    Reserved,
    /// The remote service explicitly refused, e.g. a race lost to another
    /// booking.
    Rejected,
    /// Fallback result: the service was unreachable and nothing is held.
    Degraded,
}

/// Result of a reserve or release call through the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationResult {
    pub outcome: ReservationOutcome,
    /// Human-readable detail for rejected or degraded outcomes.
    pub detail: Option<String>,
}

impl ReservationResult {
    /// Successful reservation (or acknowledged release).
    pub fn reserved() -> Self {
        Self {
            outcome: ReservationOutcome::Reserved,
            detail: None,
        }
    }

    /// Explicit refusal from the remote service.
    pub fn rejected(detail: impl Into<String>) -> Self {
        Self {
            outcome: ReservationOutcome::Rejected,
            detail: Some(detail.into()),
        }
    }

    /// Fallback result substituted for an unreachable service.
    pub fn degraded(detail: impl Into<String>) -> Self {
        Self {
            outcome: ReservationOutcome::Degraded,
            detail: Some(detail.into()),
        }
    }

    /// Returns true if the seats are held (or the release acknowledged).
    pub fn is_reserved(&self) -> bool {
        self.outcome == ReservationOutcome::Reserved
    }

    /// Returns true if this is a fallback result.
    pub fn is_degraded(&self) -> bool {
        self.outcome == ReservationOutcome::Degraded
    }
}
