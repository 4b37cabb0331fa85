use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a flight as known to the remote inventory service.
///
/// Wraps a string to provide type safety and prevent mixing up
/// flight identifiers with other string-based values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlightId(String);

impl FlightId {
    /// Creates a flight ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the flight ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FlightId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for FlightId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for FlightId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for FlightId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Seat identifier within a flight, e.g. `"1A"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatNumber(String);

impl SeatNumber {
    /// Creates a seat number from a string.
    pub fn new(seat: impl Into<String>) -> Self {
        Self(seat.into())
    }

    /// Returns the seat number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SeatNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SeatNumber {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SeatNumber {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for SeatNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Booking confirmation code (passenger name record).
///
/// Generated once per booking and never reassigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pnr(String);

impl Pnr {
    /// Generates a fresh confirmation code: the first eight hex characters
    /// of a random UUID, uppercased.
    pub fn generate() -> Self {
        let raw = Uuid::new_v4().simple().to_string();
        Self(raw[..8].to_uppercase())
    }

    /// Creates a PNR from an existing code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the confirmation code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Pnr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Pnr {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Pnr {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for Pnr {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
