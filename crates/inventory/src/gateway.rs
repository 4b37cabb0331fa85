//! The protected inventory gateway.

use std::future::Future;
use std::time::Duration;

use common::{FlightId, SeatNumber};

use crate::availability::{FlightAvailability, ReservationResult};
use crate::breaker::{BreakerConfig, CircuitBreaker};
use crate::client::{InventoryError, RemoteInventoryClient};

/// Gateway tuning: one timeout and one breaker configuration shared by
/// the three protected operations.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Upper bound on each remote call; elapsed calls count as failures.
    pub call_timeout: Duration,
    pub breaker: BreakerConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(2),
            breaker: BreakerConfig::default(),
        }
    }
}

/// Resilient front for the remote inventory service.
///
/// Every operation consults a per-operation circuit breaker, bounds the
/// remote call with a timeout, and substitutes a well-formed degraded
/// result on any failure. Transport errors never propagate past this
/// layer; callers distinguish real results from fallbacks through the
/// `degraded` flag or the `Degraded` outcome.
pub struct InventoryGateway<C: RemoteInventoryClient> {
    client: C,
    call_timeout: Duration,
    availability_breaker: CircuitBreaker,
    reserve_breaker: CircuitBreaker,
    release_breaker: CircuitBreaker,
}

impl<C: RemoteInventoryClient> InventoryGateway<C> {
    /// Wraps a raw client with per-operation breakers.
    pub fn new(client: C, config: GatewayConfig) -> Self {
        Self {
            client,
            call_timeout: config.call_timeout,
            availability_breaker: CircuitBreaker::new(
                "inventory_availability",
                config.breaker.clone(),
            ),
            reserve_breaker: CircuitBreaker::new("inventory_reserve", config.breaker.clone()),
            release_breaker: CircuitBreaker::new("inventory_release", config.breaker),
        }
    }

    /// Wraps a raw client with the default configuration.
    pub fn with_defaults(client: C) -> Self {
        Self::new(client, GatewayConfig::default())
    }

    /// Availability for a flight, or a degraded empty snapshot.
    pub async fn check_availability(&self, flight_id: &FlightId) -> FlightAvailability {
        self.protected(
            &self.availability_breaker,
            "check_availability",
            self.client.get_availability(flight_id),
            || FlightAvailability::degraded(flight_id.clone()),
        )
        .await
    }

    /// Reserves seats, or a `Degraded` result when the service is
    /// unreachable. No seats are held on a degraded result.
    pub async fn reserve(&self, flight_id: &FlightId, seats: &[SeatNumber]) -> ReservationResult {
        self.protected(
            &self.reserve_breaker,
            "reserve",
            self.client.reserve_seats(flight_id, seats),
            || ReservationResult::degraded("seat reservation is temporarily unavailable"),
        )
        .await
    }

    /// Releases seats. A `Degraded` result means the release was not
    /// confirmed, not that the caller did anything wrong.
    pub async fn release(&self, flight_id: &FlightId, seats: &[SeatNumber]) -> ReservationResult {
        self.protected(
            &self.release_breaker,
            "release",
            self.client.release_seats(flight_id, seats),
            || ReservationResult::degraded("seat release pending: inventory service unavailable"),
        )
        .await
    }

    async fn protected<T, F>(
        &self,
        breaker: &CircuitBreaker,
        operation: &'static str,
        call: F,
        fallback: impl FnOnce() -> T,
    ) -> T
    where
        F: Future<Output = Result<T, InventoryError>>,
    {
        if !breaker.allow_request() {
            metrics::counter!("inventory_short_circuits_total", "operation" => operation)
                .increment(1);
            tracing::warn!(operation, "circuit open, short-circuiting to fallback");
            return fallback();
        }

        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(Ok(result)) => {
                breaker.record_success();
                result
            }
            Ok(Err(err)) => {
                breaker.record_failure();
                metrics::counter!("inventory_call_failures_total", "operation" => operation)
                    .increment(1);
                tracing::warn!(operation, error = %err, "inventory call failed, using fallback");
                fallback()
            }
            Err(_) => {
                breaker.record_failure();
                metrics::counter!("inventory_call_failures_total", "operation" => operation)
                    .increment(1);
                tracing::warn!(
                    operation,
                    timeout_ms = self.call_timeout.as_millis() as u64,
                    "inventory call timed out, using fallback"
                );
                fallback()
            }
        }
    }

    /// Breaker guarding availability calls.
    pub fn availability_breaker(&self) -> &CircuitBreaker {
        &self.availability_breaker
    }

    /// Breaker guarding reserve calls.
    pub fn reserve_breaker(&self) -> &CircuitBreaker {
        &self.reserve_breaker
    }

    /// Breaker guarding release calls.
    pub fn release_breaker(&self) -> &CircuitBreaker {
        &self.release_breaker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breaker::CircuitState;
    use crate::client::InMemoryInventoryClient;
    use domain::Money;

    fn flight() -> FlightId {
        FlightId::new("AI-302")
    }

    fn seats(ids: &[&str]) -> Vec<SeatNumber> {
        ids.iter().map(|s| SeatNumber::new(*s)).collect()
    }

    fn fast_config(failure_threshold: u32, cooldown: Duration) -> GatewayConfig {
        GatewayConfig {
            call_timeout: Duration::from_millis(20),
            breaker: BreakerConfig {
                failure_threshold,
                failure_rate_threshold: 1.0,
                sample_window: 100,
                cooldown,
                success_threshold: 1,
            },
        }
    }

    fn gateway_with_flight(config: GatewayConfig) -> (InventoryGateway<InMemoryInventoryClient>, InMemoryInventoryClient) {
        let client = InMemoryInventoryClient::new();
        client.add_flight(
            flight(),
            &["1A", "1B", "1C"],
            Money::from_dollars(100),
            Some("2026-11-05T09:30:00"),
        );
        (InventoryGateway::new(client.clone(), config), client)
    }

    #[tokio::test]
    async fn passes_real_availability_through() {
        let (gateway, _client) = gateway_with_flight(GatewayConfig::default());

        let availability = gateway.check_availability(&flight()).await;
        assert!(!availability.degraded);
        assert_eq!(availability.available_seats.len(), 3);
        assert_eq!(availability.seat_price, Money::from_dollars(100));
    }

    #[tokio::test]
    async fn transport_failure_becomes_degraded_availability() {
        let (gateway, client) = gateway_with_flight(GatewayConfig::default());
        client.set_fail_on_availability(true);

        let availability = gateway.check_availability(&flight()).await;
        assert!(availability.degraded);
        assert!(availability.available_seats.is_empty());
        assert!(availability.seat_price.is_zero());
    }

    #[tokio::test]
    async fn timeout_becomes_degraded_availability() {
        let (gateway, client) = gateway_with_flight(fast_config(5, Duration::from_secs(60)));
        client.set_availability_delay(Some(Duration::from_millis(100)));

        let availability = gateway.check_availability(&flight()).await;
        assert!(availability.degraded);
    }

    #[tokio::test]
    async fn reserve_and_release_fallbacks_are_degraded() {
        let (gateway, client) = gateway_with_flight(GatewayConfig::default());
        client.set_fail_on_reserve(true);
        client.set_fail_on_release(true);

        let reserve = gateway.reserve(&flight(), &seats(&["1A"])).await;
        assert!(reserve.is_degraded());

        let release = gateway.release(&flight(), &seats(&["1A"])).await;
        assert!(release.is_degraded());
    }

    #[tokio::test]
    async fn open_breaker_short_circuits_without_calling_client() {
        let (gateway, client) = gateway_with_flight(fast_config(3, Duration::from_secs(60)));
        client.set_fail_on_availability(true);

        for _ in 0..3 {
            gateway.check_availability(&flight()).await;
        }
        assert_eq!(gateway.availability_breaker().state(), CircuitState::Open);
        assert_eq!(client.availability_calls(), 3);

        // Short-circuited: still degraded, client not contacted again.
        let availability = gateway.check_availability(&flight()).await;
        assert!(availability.degraded);
        assert_eq!(client.availability_calls(), 3);
    }

    #[tokio::test]
    async fn breakers_are_per_operation() {
        let (gateway, client) = gateway_with_flight(fast_config(1, Duration::from_secs(60)));
        client.set_fail_on_availability(true);

        gateway.check_availability(&flight()).await;
        assert_eq!(gateway.availability_breaker().state(), CircuitState::Open);

        // Reserve is guarded by its own breaker and still goes through.
        let reserve = gateway.reserve(&flight(), &seats(&["1A"])).await;
        assert!(reserve.is_reserved());
        assert_eq!(gateway.reserve_breaker().state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn recovers_through_half_open_probe() {
        let (gateway, client) = gateway_with_flight(fast_config(1, Duration::from_millis(30)));
        client.set_fail_on_availability(true);

        gateway.check_availability(&flight()).await;
        assert_eq!(gateway.availability_breaker().state(), CircuitState::Open);

        client.set_fail_on_availability(false);
        tokio::time::sleep(Duration::from_millis(50)).await;

        // Probe goes through and a single success closes the breaker.
        let availability = gateway.check_availability(&flight()).await;
        assert!(!availability.degraded);
        assert_eq!(gateway.availability_breaker().state(), CircuitState::Closed);
        assert_eq!(client.availability_calls(), 2);
    }
}
