//! Booking request input and its validation.

use common::SeatNumber;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Passenger descriptor inside a booking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerDetails {
    pub name: String,
    pub gender: String,
    pub age: u32,
}

/// Immutable input to the booking saga.
///
/// Validated with [`BookingRequest::validate`] before any remote call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub email: String,
    pub name: String,
    pub seats: u32,
    pub passengers: Vec<PassengerDetails>,
    pub meal_preference: String,
    /// Requested seats, in passenger order.
    pub seat_numbers: Vec<SeatNumber>,
}

impl BookingRequest {
    /// Checks the structural invariants of the request.
    ///
    /// Passenger count and seat-number count must both equal the requested
    /// seat count, and every passenger must have an age of at least one.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.seats == 0 {
            return Err(DomainError::Validation(
                "number of seats must be at least 1".to_string(),
            ));
        }
        if self.passengers.len() != self.seats as usize {
            return Err(DomainError::Validation(
                "number of seats must equal number of passengers".to_string(),
            ));
        }
        if self.seat_numbers.len() != self.seats as usize {
            return Err(DomainError::Validation(
                "seat numbers count must match number of seats".to_string(),
            ));
        }
        if let Some(p) = self.passengers.iter().find(|p| p.age == 0) {
            return Err(DomainError::Validation(format!(
                "passenger '{}' must have an age of at least 1",
                p.name
            )));
        }
        Ok(())
    }
}
