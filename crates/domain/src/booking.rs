//! The booking aggregate and its passengers.

use chrono::{DateTime, NaiveDateTime, Utc};
use common::{FlightId, Pnr, SeatNumber};
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Lifecycle of a booking.
///
/// `Cancelled` is terminal; there is no transition out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    /// Seats are reserved and the booking is persisted.
    Confirmed,
    /// The booking was cancelled by the requester (terminal state).
    Cancelled,
}

impl BookingStatus {
    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A passenger travelling under a booking.
///
/// Owned exclusively by its parent [`Booking`]; passengers have no
/// independent lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    pub name: String,
    pub gender: String,
    pub age: u32,
}

/// A persisted booking.
///
/// Created only by a successful booking saga run. The only mutation after
/// creation is [`Booking::cancel`]; bookings are never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Confirmation code, unique across all bookings.
    pub pnr: Pnr,
    pub email: String,
    pub name: String,
    pub booked_at: DateTime<Utc>,
    /// Journey start, when the inventory service reported a parseable one.
    pub journey_at: Option<NaiveDateTime>,
    pub seats: u32,
    /// Unit price times seat count, fixed at creation time.
    pub total_price: Money,
    pub status: BookingStatus,
    pub flight_id: FlightId,
    pub passengers: Vec<Passenger>,
    /// Seats held with the inventory service, in request order.
    pub seat_numbers: Vec<SeatNumber>,
}

impl Booking {
    /// Marks the booking cancelled.
    ///
    /// Idempotent: cancelling an already-cancelled booking leaves it
    /// cancelled.
    pub fn cancel(&mut self) {
        self.status = BookingStatus::Cancelled;
    }

    /// Returns true if the booking has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.status == BookingStatus::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking() -> Booking {
        Booking {
            pnr: Pnr::new("AB12CD34"),
            email: "rina@example.com".to_string(),
            name: "Rina Devi".to_string(),
            booked_at: Utc::now(),
            journey_at: None,
            seats: 1,
            total_price: Money::from_dollars(100),
            status: BookingStatus::Confirmed,
            flight_id: FlightId::new("AI-302"),
            passengers: vec![Passenger {
                name: "Rina Devi".to_string(),
                gender: "F".to_string(),
                age: 34,
            }],
            seat_numbers: vec![SeatNumber::new("1A")],
        }
    }

    #[test]
    fn cancel_transitions_to_cancelled() {
        let mut b = booking();
        assert!(!b.is_cancelled());
        b.cancel();
        assert_eq!(b.status, BookingStatus::Cancelled);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut b = booking();
        b.cancel();
        b.cancel();
        assert!(b.is_cancelled());
    }

    #[test]
    fn status_display_matches_wire_names() {
        assert_eq!(BookingStatus::Confirmed.to_string(), "CONFIRMED");
        assert_eq!(BookingStatus::Cancelled.to_string(), "CANCELLED");
    }

    #[test]
    fn booking_serialization_roundtrip() {
        let b = booking();
        let json = serde_json::to_string(&b).unwrap();
        let back: Booking = serde_json::from_str(&json).unwrap();
        assert_eq!(b, back);
    }
}
