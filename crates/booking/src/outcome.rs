//! Outcome and view types returned by the orchestrators.

use common::{FlightId, Pnr, SeatNumber};
use domain::{Booking, BookingStatus, Money, Passenger};
use serde::{Deserialize, Serialize};

/// Terminal result of one booking saga run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BookingOutcome {
    /// Seats are reserved and the booking persisted.
    Confirmed { pnr: Pnr, total_price: Money },
    /// The saga stopped at a business failure; nothing was persisted.
    Failed { reason: BookingFailure },
}

impl BookingOutcome {
    /// Returns true for a confirmed booking.
    pub fn is_confirmed(&self) -> bool {
        matches!(self, BookingOutcome::Confirmed { .. })
    }
}

/// Business failures of the booking saga.
///
/// These are ordinary outcomes, not errors: they carry a user-facing
/// reason and are never retried automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingFailure {
    /// Availability came back degraded; the flight service is down.
    FlightServiceUnavailable,
    /// The requested seats are not all free.
    SeatsUnavailable,
    /// The reserve call fell back to a degraded result.
    ReservationUnavailable,
    /// The remote service explicitly refused the reservation.
    ReservationRefused,
}

impl BookingFailure {
    /// User-facing reason string.
    pub fn message(&self) -> &'static str {
        match self {
            BookingFailure::FlightServiceUnavailable => {
                "Cannot book right now: flight service is unavailable"
            }
            BookingFailure::SeatsUnavailable => "Requested seats are unavailable",
            BookingFailure::ReservationUnavailable => {
                "Seat reservation failed (flight service unavailable)"
            }
            BookingFailure::ReservationRefused => "Failed to reserve seats",
        }
    }
}

impl std::fmt::Display for BookingFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Receipt returned by a successful cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationReceipt {
    pub pnr: Pnr,
    pub message: String,
}

/// One line of a requester's booking history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub pnr: Pnr,
    pub flight_id: FlightId,
    pub status: BookingStatus,
}

impl From<&Booking> for HistoryEntry {
    fn from(booking: &Booking) -> Self {
        Self {
            pnr: booking.pnr.clone(),
            flight_id: booking.flight_id.clone(),
            status: booking.status,
        }
    }
}

/// Ticket details returned by a PNR lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketView {
    pub pnr: Pnr,
    pub flight_id: FlightId,
    pub status: BookingStatus,
    pub seat_numbers: Vec<SeatNumber>,
    pub passengers: Vec<Passenger>,
}

impl From<&Booking> for TicketView {
    fn from(booking: &Booking) -> Self {
        Self {
            pnr: booking.pnr.clone(),
            flight_id: booking.flight_id.clone(),
            status: booking.status,
            seat_numbers: booking.seat_numbers.clone(),
            passengers: booking.passengers.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_messages_are_user_facing() {
        assert_eq!(
            BookingFailure::FlightServiceUnavailable.to_string(),
            "Cannot book right now: flight service is unavailable"
        );
        assert_eq!(
            BookingFailure::ReservationRefused.to_string(),
            "Failed to reserve seats"
        );
    }

    #[test]
    fn confirmed_outcome_is_confirmed() {
        let outcome = BookingOutcome::Confirmed {
            pnr: Pnr::new("AB12CD34"),
            total_price: Money::from_dollars(200),
        };
        assert!(outcome.is_confirmed());
        assert!(
            !BookingOutcome::Failed {
                reason: BookingFailure::SeatsUnavailable
            }
            .is_confirmed()
        );
    }
}
