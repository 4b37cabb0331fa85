//! Domain model for the flight booking system.
//!
//! This crate provides the core booking types:
//! - `Booking` and `Passenger` with the Confirmed → Cancelled status machine
//! - `BookingRequest` input validation
//! - `Money` for seat prices and booking totals

pub mod booking;
pub mod error;
pub mod money;
pub mod request;

pub use booking::{Booking, BookingStatus, Passenger};
pub use error::DomainError;
pub use money::Money;
pub use request::{BookingRequest, PassengerDetails};
