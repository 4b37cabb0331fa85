//! Booking orchestration core.
//!
//! Runs the reserve-then-persist saga for flight bookings: check seat
//! availability, reserve seats through the protected inventory gateway,
//! persist the booking, then send a best-effort notification. The
//! cancellation counterpart commits first and releases held seats
//! best-effort afterwards, so cancellation is never blocked by
//! inventory-service health.

pub mod error;
pub mod notify;
pub mod outcome;
pub mod service;
pub mod store;

pub use error::BookingError;
pub use notify::{
    BookingNotification, InMemoryNotificationPublisher, NotificationError, NotificationPublisher,
};
pub use outcome::{BookingFailure, BookingOutcome, CancellationReceipt, HistoryEntry, TicketView};
pub use service::BookingService;
pub use store::{BookingStore, InMemoryBookingStore, StoreError};
