// Notifier - the queue-producer half of the pipeline
//
// Turns due events into Notification messages and publishes them with a
// bounded retry per message. Messages in a batch are independent: one
// message exhausting its retries never blocks or aborts the rest.

use std::sync::Arc;
use std::time::Duration;

use calendar_core::{Event, NotificationQueue, Result};

/// Notifier configuration
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Publish attempts per message before the message is dropped
    pub attempts: u32,
    /// Pause between attempts; zero retries immediately
    pub retry_backoff: Duration,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            attempts: 5,
            retry_backoff: Duration::ZERO,
        }
    }
}

/// Publishes due-event notifications to the queue
pub struct Notifier {
    queue: Arc<dyn NotificationQueue>,
    config: NotifierConfig,
}

impl Notifier {
    pub fn new(queue: Arc<dyn NotificationQueue>, config: NotifierConfig) -> Self {
        Self { queue, config }
    }

    /// Publish one notification per event.
    ///
    /// Failures are logged and swallowed: the scheduler has already moved
    /// on, and a message that could not be published is simply dropped (the
    /// due predicate re-surfaces the event on the next tick while its lead
    /// window lasts).
    pub async fn notify(&self, events: &[Event]) {
        for event in events {
            let notification = event.notification();
            let payload = match serde_json::to_vec(&notification) {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to encode msg: {notification}");
                    continue;
                }
            };

            if self.publish_with_retry(&payload).await {
                tracing::debug!(id = event.id, title = %event.title, "sent notification");
            } else {
                tracing::warn!(
                    id = event.id,
                    attempts = self.config.attempts,
                    "failed to publish a notification, dropping message"
                );
            }
        }
    }

    async fn publish_with_retry(&self, payload: &[u8]) -> bool {
        for attempt in 1..=self.config.attempts {
            match self.queue.publish(payload).await {
                Ok(()) => return true,
                Err(e) => {
                    tracing::debug!(attempt, error = %e, "publish attempt failed");
                    if attempt < self.config.attempts && !self.config.retry_backoff.is_zero() {
                        tokio::time::sleep(self.config.retry_backoff).await;
                    }
                }
            }
        }
        false
    }

    /// Close the owned queue connection
    pub async fn close(&self) -> Result<()> {
        self.queue.close().await
    }
}
