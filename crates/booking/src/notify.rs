//! Notification publisher trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{FlightId, Pnr};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Payload sent to the notification side-channel after a booking commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingNotification {
    pub email: String,
    pub name: String,
    pub pnr: Pnr,
    pub flight_id: FlightId,
}

/// Errors raised by a notification publisher.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The publish attempt failed.
    #[error("Notification publish failed: {0}")]
    Publish(String),
}

/// Fire-and-forget side channel for booking confirmations.
///
/// The orchestrator makes exactly one publish attempt per booking and
/// treats any failure as non-fatal; it never retries.
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    /// Publishes one booking notification.
    async fn publish(&self, notification: BookingNotification) -> Result<(), NotificationError>;
}

#[derive(Debug, Default)]
struct InMemoryPublisherState {
    published: Vec<BookingNotification>,
    attempts: u32,
    fail_on_publish: bool,
}

/// In-memory notification publisher for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationPublisher {
    state: Arc<RwLock<InMemoryPublisherState>>,
}

impl InMemoryNotificationPublisher {
    /// Creates a new in-memory publisher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the publisher to fail on publish calls.
    pub fn set_fail_on_publish(&self, fail: bool) {
        self.state.write().unwrap().fail_on_publish = fail;
    }

    /// Notifications successfully published, in order.
    pub fn published(&self) -> Vec<BookingNotification> {
        self.state.read().unwrap().published.clone()
    }

    /// Number of publish attempts, successful or not.
    pub fn attempt_count(&self) -> u32 {
        self.state.read().unwrap().attempts
    }
}

#[async_trait]
impl NotificationPublisher for InMemoryNotificationPublisher {
    async fn publish(&self, notification: BookingNotification) -> Result<(), NotificationError> {
        let mut state = self.state.write().unwrap();
        state.attempts += 1;
        if state.fail_on_publish {
            return Err(NotificationError::Publish("broker unreachable".to_string()));
        }
        state.published.push(notification);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification() -> BookingNotification {
        BookingNotification {
            email: "anil@example.com".to_string(),
            name: "Anil Kumar".to_string(),
            pnr: Pnr::new("AB12CD34"),
            flight_id: FlightId::new("AI-302"),
        }
    }

    #[tokio::test]
    async fn publish_records_payload() {
        let publisher = InMemoryNotificationPublisher::new();
        publisher.publish(notification()).await.unwrap();

        assert_eq!(publisher.attempt_count(), 1);
        assert_eq!(publisher.published(), vec![notification()]);
    }

    #[tokio::test]
    async fn failed_publish_still_counts_as_attempt() {
        let publisher = InMemoryNotificationPublisher::new();
        publisher.set_fail_on_publish(true);

        let result = publisher.publish(notification()).await;
        assert!(result.is_err());
        assert_eq!(publisher.attempt_count(), 1);
        assert!(publisher.published().is_empty());
    }
}
