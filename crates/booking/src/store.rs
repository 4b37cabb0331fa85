//! Booking store trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::Pnr;
use domain::Booking;
use thiserror::Error;

/// Errors raised by a booking store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not complete the operation.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Durable home for bookings.
///
/// A save writes the booking together with its passenger list atomically;
/// there is never a booking with a partial passenger list. Bookings are
/// owned by the store once persisted.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Persists a booking (insert or update by PNR) and returns the
    /// stored record.
    async fn save(&self, booking: Booking) -> Result<Booking, StoreError>;

    /// Looks up a booking by confirmation code.
    async fn find_by_pnr(&self, pnr: &Pnr) -> Result<Option<Booking>, StoreError>;

    /// Returns all bookings made under the given requester email, in
    /// creation order.
    async fn find_by_email(&self, email: &str) -> Result<Vec<Booking>, StoreError>;
}

#[derive(Debug, Default)]
struct InMemoryStoreState {
    bookings: Vec<Booking>,
    fail_on_save: bool,
}

/// In-memory booking store for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBookingStore {
    state: Arc<RwLock<InMemoryStoreState>>,
}

impl InMemoryBookingStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to fail on the next save call.
    pub fn set_fail_on_save(&self, fail: bool) {
        self.state.write().unwrap().fail_on_save = fail;
    }

    /// Returns the number of stored bookings.
    pub fn booking_count(&self) -> usize {
        self.state.read().unwrap().bookings.len()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn save(&self, booking: Booking) -> Result<Booking, StoreError> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_save {
            return Err(StoreError::Unavailable("disk full".to_string()));
        }
        match state.bookings.iter_mut().find(|b| b.pnr == booking.pnr) {
            Some(existing) => *existing = booking.clone(),
            None => state.bookings.push(booking.clone()),
        }
        Ok(booking)
    }

    async fn find_by_pnr(&self, pnr: &Pnr) -> Result<Option<Booking>, StoreError> {
        let state = self.state.read().unwrap();
        Ok(state.bookings.iter().find(|b| &b.pnr == pnr).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<Booking>, StoreError> {
        let state = self.state.read().unwrap();
        Ok(state
            .bookings
            .iter()
            .filter(|b| b.email == email)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::{FlightId, SeatNumber};
    use domain::{BookingStatus, Money, Passenger};

    fn booking(pnr: &str, email: &str) -> Booking {
        Booking {
            pnr: Pnr::new(pnr),
            email: email.to_string(),
            name: "Anil Kumar".to_string(),
            booked_at: Utc::now(),
            journey_at: None,
            seats: 1,
            total_price: Money::from_dollars(100),
            status: BookingStatus::Confirmed,
            flight_id: FlightId::new("AI-302"),
            passengers: vec![Passenger {
                name: "Anil Kumar".to_string(),
                gender: "M".to_string(),
                age: 41,
            }],
            seat_numbers: vec![SeatNumber::new("1A")],
        }
    }

    #[tokio::test]
    async fn save_and_find_by_pnr() {
        let store = InMemoryBookingStore::new();
        store.save(booking("AAAA1111", "a@example.com")).await.unwrap();

        let found = store.find_by_pnr(&Pnr::new("AAAA1111")).await.unwrap();
        assert!(found.is_some());
        assert!(store.find_by_pnr(&Pnr::new("ZZZZ9999")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_updates_existing_booking() {
        let store = InMemoryBookingStore::new();
        let mut b = store.save(booking("AAAA1111", "a@example.com")).await.unwrap();

        b.cancel();
        store.save(b).await.unwrap();

        assert_eq!(store.booking_count(), 1);
        let found = store.find_by_pnr(&Pnr::new("AAAA1111")).await.unwrap().unwrap();
        assert!(found.is_cancelled());
    }

    #[tokio::test]
    async fn find_by_email_preserves_creation_order() {
        let store = InMemoryBookingStore::new();
        store.save(booking("AAAA1111", "a@example.com")).await.unwrap();
        store.save(booking("BBBB2222", "b@example.com")).await.unwrap();
        store.save(booking("CCCC3333", "a@example.com")).await.unwrap();

        let found = store.find_by_email("a@example.com").await.unwrap();
        let pnrs: Vec<&str> = found.iter().map(|b| b.pnr.as_str()).collect();
        assert_eq!(pnrs, ["AAAA1111", "CCCC3333"]);
    }

    #[tokio::test]
    async fn fail_switch_surfaces_store_error() {
        let store = InMemoryBookingStore::new();
        store.set_fail_on_save(true);
        let result = store.save(booking("AAAA1111", "a@example.com")).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(store.booking_count(), 0);
    }
}
