//! The booking and cancellation orchestrators.

use chrono::{NaiveDateTime, Utc};
use common::{FlightId, Pnr};
use domain::{Booking, BookingRequest, BookingStatus, Passenger};
use inventory::{InventoryGateway, RemoteInventoryClient, ReservationOutcome};

use crate::error::BookingError;
use crate::notify::{BookingNotification, NotificationPublisher};
use crate::outcome::{BookingFailure, BookingOutcome, CancellationReceipt, HistoryEntry, TicketView};
use crate::store::BookingStore;

/// Orchestrates the booking saga and its cancellation counterpart.
///
/// Booking is reserve-then-commit: the service never claims success
/// without a confirmed reservation. Cancellation is the asymmetric
/// opposite, commit-then-release: the cancellation stands even when the
/// release call fails, at the cost of temporarily leaking held seats.
pub struct BookingService<C, S, N>
where
    C: RemoteInventoryClient,
    S: BookingStore,
    N: NotificationPublisher,
{
    gateway: InventoryGateway<C>,
    store: S,
    publisher: N,
}

impl<C, S, N> BookingService<C, S, N>
where
    C: RemoteInventoryClient,
    S: BookingStore,
    N: NotificationPublisher,
{
    /// Creates a new booking service.
    pub fn new(gateway: InventoryGateway<C>, store: S, publisher: N) -> Self {
        Self {
            gateway,
            store,
            publisher,
        }
    }

    /// Runs the booking saga for one request.
    ///
    /// Either fully commits a booking or commits nothing. Business
    /// failures (service degraded, seats taken, reservation refused) come
    /// back as [`BookingOutcome::Failed`]; only validation and store
    /// trouble are hard errors.
    #[tracing::instrument(skip(self, request))]
    pub async fn book_ticket(
        &self,
        flight_id: &FlightId,
        request: &BookingRequest,
    ) -> Result<BookingOutcome, BookingError> {
        metrics::counter!("booking_attempts_total").increment(1);

        // Fails fast, before any remote call.
        request.validate()?;

        let availability = self.gateway.check_availability(flight_id).await;
        if availability.degraded {
            return Ok(self.fail(BookingFailure::FlightServiceUnavailable));
        }

        // Subset check against genuinely free seats. An optimization to
        // skip a doomed reservation attempt; the remote service remains
        // the sole arbiter of seat ownership.
        if !availability.contains_all(&request.seat_numbers) {
            return Ok(self.fail(BookingFailure::SeatsUnavailable));
        }

        let reservation = self.gateway.reserve(flight_id, &request.seat_numbers).await;
        match reservation.outcome {
            ReservationOutcome::Degraded => {
                return Ok(self.fail(BookingFailure::ReservationUnavailable));
            }
            ReservationOutcome::Rejected => {
                return Ok(self.fail(BookingFailure::ReservationRefused));
            }
            ReservationOutcome::Reserved => {}
        }

        let booking = Booking {
            pnr: Pnr::generate(),
            email: request.email.clone(),
            name: request.name.clone(),
            booked_at: Utc::now(),
            journey_at: availability.start_date.as_deref().and_then(parse_journey),
            seats: request.seats,
            total_price: availability.seat_price.total_for_seats(request.seats),
            status: BookingStatus::Confirmed,
            flight_id: flight_id.clone(),
            passengers: request
                .passengers
                .iter()
                .map(|p| Passenger {
                    name: p.name.clone(),
                    gender: p.gender.clone(),
                    age: p.age,
                })
                .collect(),
            seat_numbers: request.seat_numbers.clone(),
        };

        // The saga's commit point. A save failure after a successful
        // reservation is a hard error without a compensating release: the
        // requester's retry re-reserves the same seats.
        let booking = self.store.save(booking).await?;

        let notification = BookingNotification {
            email: booking.email.clone(),
            name: booking.name.clone(),
            pnr: booking.pnr.clone(),
            flight_id: booking.flight_id.clone(),
        };
        if let Err(err) = self.publisher.publish(notification).await {
            tracing::warn!(pnr = %booking.pnr, error = %err, "booking notification failed");
        }

        metrics::counter!("bookings_confirmed_total").increment(1);
        tracing::info!(
            pnr = %booking.pnr,
            total_price = %booking.total_price,
            "booking confirmed"
        );
        Ok(BookingOutcome::Confirmed {
            pnr: booking.pnr,
            total_price: booking.total_price,
        })
    }

    /// Looks up a ticket by confirmation code.
    pub async fn get_ticket(&self, pnr: &Pnr) -> Result<TicketView, BookingError> {
        let booking = self
            .store
            .find_by_pnr(pnr)
            .await?
            .ok_or_else(|| BookingError::NotFound(pnr.clone()))?;
        Ok(TicketView::from(&booking))
    }

    /// Returns the requester's booking history, any status, in creation
    /// order.
    pub async fn booking_history(&self, email: &str) -> Result<Vec<HistoryEntry>, BookingError> {
        let bookings = self.store.find_by_email(email).await?;
        Ok(bookings.iter().map(HistoryEntry::from).collect())
    }

    /// Cancels a booking by confirmation code.
    ///
    /// The persisted status transition is the commit point; the seat
    /// release afterwards is best-effort and its failure is only logged.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_booking(&self, pnr: &Pnr) -> Result<CancellationReceipt, BookingError> {
        let mut booking = self
            .store
            .find_by_pnr(pnr)
            .await?
            .ok_or_else(|| BookingError::NotFound(pnr.clone()))?;

        booking.cancel();
        let booking = self.store.save(booking).await?;

        // Commit point passed: the cancellation stands regardless of what
        // the release call does.
        let release = self
            .gateway
            .release(&booking.flight_id, &booking.seat_numbers)
            .await;
        if release.is_degraded() {
            tracing::warn!(
                pnr = %booking.pnr,
                flight_id = %booking.flight_id,
                "seat release not confirmed; seats stay held until inventory recovers"
            );
        }

        metrics::counter!("cancellations_total").increment(1);
        Ok(CancellationReceipt {
            pnr: booking.pnr,
            message: "Ticket cancelled successfully".to_string(),
        })
    }

    /// The protected gateway, exposed for breaker observability.
    pub fn gateway(&self) -> &InventoryGateway<C> {
        &self.gateway
    }

    fn fail(&self, reason: BookingFailure) -> BookingOutcome {
        metrics::counter!("bookings_failed_total").increment(1);
        tracing::warn!(%reason, "booking failed");
        BookingOutcome::Failed { reason }
    }
}

/// Best-effort parse of the journey timestamp reported by the inventory
/// service. Unparseable input yields `None` rather than failing the
/// booking.
fn parse_journey(raw: &str) -> Option<NaiveDateTime> {
    raw.parse::<NaiveDateTime>().ok()
}
