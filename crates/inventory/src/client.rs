//! Raw inventory client trait and in-memory implementation.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use common::{FlightId, SeatNumber};
use domain::Money;
use thiserror::Error;

use crate::availability::{FlightAvailability, ReservationResult};

/// Transport-level failures raised by the raw client.
///
/// These never travel past the gateway; it absorbs them into fallback
/// results.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// The remote service could not be reached or the connection broke.
    #[error("Inventory transport error: {0}")]
    Transport(String),

    /// The remote service answered with a payload we cannot interpret.
    #[error("Malformed inventory response: {0}")]
    MalformedResponse(String),
}

/// Raw point-to-point calls to the remote inventory service.
///
/// No resilience logic lives here; timeouts and fallbacks are imposed by
/// the gateway wrapping this client.
#[async_trait]
pub trait RemoteInventoryClient: Send + Sync {
    /// Fetches the availability snapshot for a flight.
    async fn get_availability(
        &self,
        flight_id: &FlightId,
    ) -> Result<FlightAvailability, InventoryError>;

    /// Asks the remote service to hold the given seats.
    async fn reserve_seats(
        &self,
        flight_id: &FlightId,
        seats: &[SeatNumber],
    ) -> Result<ReservationResult, InventoryError>;

    /// Asks the remote service to free previously held seats.
    async fn release_seats(
        &self,
        flight_id: &FlightId,
        seats: &[SeatNumber],
    ) -> Result<ReservationResult, InventoryError>;
}

#[derive(Debug, Clone)]
struct FlightRecord {
    available: BTreeSet<SeatNumber>,
    seat_price: Money,
    start_date: Option<String>,
}

#[derive(Debug, Default)]
struct InMemoryInventoryState {
    flights: HashMap<FlightId, FlightRecord>,
    availability_calls: u32,
    reserve_calls: u32,
    release_calls: u32,
    fail_on_availability: bool,
    fail_on_reserve: bool,
    fail_on_release: bool,
    reject_reserve: bool,
    availability_delay: Option<Duration>,
}

/// In-memory inventory service for testing.
///
/// Call counters prove short-circuit behavior; fail switches simulate
/// transport errors; `reject_reserve` simulates losing the seat race to
/// a concurrent booking; `availability_delay` drives gateway timeouts.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventoryClient {
    state: Arc<RwLock<InMemoryInventoryState>>,
}

impl InMemoryInventoryClient {
    /// Creates an empty in-memory inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a flight fixture with free seats, a unit price, and an
    /// optional journey start string.
    pub fn add_flight(
        &self,
        flight_id: FlightId,
        seats: &[&str],
        seat_price: Money,
        start_date: Option<&str>,
    ) {
        let record = FlightRecord {
            available: seats.iter().map(|s| SeatNumber::new(*s)).collect(),
            seat_price,
            start_date: start_date.map(str::to_string),
        };
        self.state.write().unwrap().flights.insert(flight_id, record);
    }

    /// Configures availability calls to fail at the transport level.
    pub fn set_fail_on_availability(&self, fail: bool) {
        self.state.write().unwrap().fail_on_availability = fail;
    }

    /// Configures reserve calls to fail at the transport level.
    pub fn set_fail_on_reserve(&self, fail: bool) {
        self.state.write().unwrap().fail_on_reserve = fail;
    }

    /// Configures release calls to fail at the transport level.
    pub fn set_fail_on_release(&self, fail: bool) {
        self.state.write().unwrap().fail_on_release = fail;
    }

    /// Configures reserve calls to be explicitly refused, as when another
    /// booking wins the seats first.
    pub fn set_reject_reserve(&self, reject: bool) {
        self.state.write().unwrap().reject_reserve = reject;
    }

    /// Delays availability calls, e.g. beyond the gateway timeout.
    pub fn set_availability_delay(&self, delay: Option<Duration>) {
        self.state.write().unwrap().availability_delay = delay;
    }

    /// Number of availability calls received.
    pub fn availability_calls(&self) -> u32 {
        self.state.read().unwrap().availability_calls
    }

    /// Number of reserve calls received.
    pub fn reserve_calls(&self) -> u32 {
        self.state.read().unwrap().reserve_calls
    }

    /// Number of release calls received.
    pub fn release_calls(&self) -> u32 {
        self.state.read().unwrap().release_calls
    }

    /// Seats currently free on a flight.
    pub fn available_seats(&self, flight_id: &FlightId) -> BTreeSet<SeatNumber> {
        self.state
            .read()
            .unwrap()
            .flights
            .get(flight_id)
            .map(|record| record.available.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RemoteInventoryClient for InMemoryInventoryClient {
    async fn get_availability(
        &self,
        flight_id: &FlightId,
    ) -> Result<FlightAvailability, InventoryError> {
        // Count the call before sleeping so a timed-out call still counts
        // as having reached the service.
        let delay = {
            let mut state = self.state.write().unwrap();
            state.availability_calls += 1;
            state.availability_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.state.read().unwrap();
        if state.fail_on_availability {
            return Err(InventoryError::Transport("connection refused".to_string()));
        }
        let record = state.flights.get(flight_id).ok_or_else(|| {
            InventoryError::MalformedResponse(format!("unknown flight {flight_id}"))
        })?;
        Ok(FlightAvailability {
            flight_id: flight_id.clone(),
            available_seats: record.available.clone(),
            seat_price: record.seat_price,
            start_date: record.start_date.clone(),
            degraded: false,
        })
    }

    async fn reserve_seats(
        &self,
        flight_id: &FlightId,
        seats: &[SeatNumber],
    ) -> Result<ReservationResult, InventoryError> {
        let mut state = self.state.write().unwrap();
        state.reserve_calls += 1;
        if state.fail_on_reserve {
            return Err(InventoryError::Transport("connection reset".to_string()));
        }
        if state.reject_reserve {
            return Ok(ReservationResult::rejected("seats already taken"));
        }
        let Some(record) = state.flights.get_mut(flight_id) else {
            return Ok(ReservationResult::rejected(format!(
                "unknown flight {flight_id}"
            )));
        };
        if !seats.iter().all(|s| record.available.contains(s)) {
            return Ok(ReservationResult::rejected(
                "requested seats are no longer available",
            ));
        }
        for seat in seats {
            record.available.remove(seat);
        }
        Ok(ReservationResult::reserved())
    }

    async fn release_seats(
        &self,
        flight_id: &FlightId,
        seats: &[SeatNumber],
    ) -> Result<ReservationResult, InventoryError> {
        let mut state = self.state.write().unwrap();
        state.release_calls += 1;
        if state.fail_on_release {
            return Err(InventoryError::Transport("connection reset".to_string()));
        }
        if let Some(record) = state.flights.get_mut(flight_id) {
            for seat in seats {
                record.available.insert(seat.clone());
            }
        }
        Ok(ReservationResult::reserved())
    }
}
