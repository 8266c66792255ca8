// Consumer - drains the queue into the sink
//
// Races cancellation against the next message. Decode failures skip the
// message; sink failures are logged and the message still counts as
// processed (at-most-once from this side of the queue). The queue is
// closed only after the loop has exited, so cancellation never drops an
// in-flight message.

use std::sync::Arc;

use calendar_core::{Notification, NotificationQueue, Result, Sink};
use tokio_util::sync::CancellationToken;

/// Queue-to-sink pump
pub struct Consumer {
    queue: Arc<dyn NotificationQueue>,
    sink: Arc<dyn Sink>,
    shutdown: CancellationToken,
}

impl Consumer {
    pub fn new(
        queue: Arc<dyn NotificationQueue>,
        sink: Arc<dyn Sink>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            queue,
            sink,
            shutdown,
        }
    }

    /// Run until cancelled. A queue-level receive failure is fatal and
    /// propagates after the connection is released.
    pub async fn run(self) -> Result<()> {
        let result = self.consume().await;
        if let Err(e) = self.queue.close().await {
            tracing::warn!(error = %e, "failed to disconnect from queue properly");
        }
        tracing::debug!("consumer stopped");
        result
    }

    async fn consume(&self) -> Result<()> {
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => return Ok(()),
                received = self.queue.receive() => match received {
                    // empty poll window; go around and re-check cancellation
                    Ok(None) => continue,
                    Ok(Some(payload)) => self.dispatch(&payload).await,
                    Err(e) => {
                        tracing::error!(error = %e, "queue receive failed");
                        return Err(e);
                    }
                },
            }
        }
    }

    async fn dispatch(&self, payload: &[u8]) {
        let notification: Notification = match serde_json::from_slice(payload) {
            Ok(notification) => notification,
            Err(e) => {
                tracing::warn!(error = %e, "failed to decode a message: {}", String::from_utf8_lossy(payload));
                return;
            }
        };

        if let Err(e) = self.sink.deliver(&notification).await {
            // no redelivery: the message is considered processed
            tracing::warn!(error = %e, "err notifying: {notification}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use calendar_core::{CalendarError, InMemoryQueue};
    use std::time::Duration;
    use tokio::sync::mpsc;

    /// Sink pushing every delivery onto a channel for the test to await
    struct RecordingSink {
        tx: mpsc::UnboundedSender<Notification>,
    }

    impl RecordingSink {
        fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Notification>) {
            let (tx, rx) = mpsc::unbounded_channel();
            (Arc::new(Self { tx }), rx)
        }
    }

    #[async_trait]
    impl Sink for RecordingSink {
        async fn deliver(&self, notification: &Notification) -> calendar_core::Result<()> {
            self.tx
                .send(notification.clone())
                .map_err(|_| CalendarError::sink("recorder gone"))
        }
    }

    /// Sink that always fails
    struct FailingSink;

    #[async_trait]
    impl Sink for FailingSink {
        async fn deliver(&self, _notification: &Notification) -> calendar_core::Result<()> {
            Err(CalendarError::sink("receiver down"))
        }
    }

    fn notification(id: i64) -> Notification {
        Notification {
            id,
            title: format!("event-{id}"),
            event_time: "2026-06-01T08:00:00Z".parse().unwrap(),
            owner: 2,
        }
    }

    #[tokio::test]
    async fn delivers_decoded_messages_to_the_sink() {
        let queue = Arc::new(InMemoryQueue::new());
        let (sink, mut rx) = RecordingSink::new();
        let token = CancellationToken::new();

        queue
            .publish(&serde_json::to_vec(&notification(1)).unwrap())
            .await
            .unwrap();
        queue
            .publish(&serde_json::to_vec(&notification(2)).unwrap())
            .await
            .unwrap();

        let consumer = Consumer::new(queue.clone(), sink, token.clone());
        let handle = tokio::spawn(consumer.run());

        assert_eq!(rx.recv().await.unwrap(), notification(1));
        assert_eq!(rx.recv().await.unwrap(), notification(2));

        token.cancel();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn undecodable_messages_are_skipped() {
        let queue = Arc::new(InMemoryQueue::new());
        let (sink, mut rx) = RecordingSink::new();
        let token = CancellationToken::new();

        queue.publish(b"not json").await.unwrap();
        queue
            .publish(&serde_json::to_vec(&notification(3)).unwrap())
            .await
            .unwrap();

        let handle = tokio::spawn(Consumer::new(queue, sink, token.clone()).run());

        // the bad message is dropped, the good one still arrives
        assert_eq!(rx.recv().await.unwrap(), notification(3));

        token.cancel();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn sink_failure_does_not_stop_the_loop() {
        let queue = Arc::new(InMemoryQueue::new());
        let token = CancellationToken::new();

        queue
            .publish(&serde_json::to_vec(&notification(4)).unwrap())
            .await
            .unwrap();

        let handle = tokio::spawn(Consumer::new(queue.clone(), Arc::new(FailingSink), token.clone()).run());

        // give the consumer time to process and survive the failure
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!handle.is_finished());

        token.cancel();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn cancellation_closes_the_queue_after_the_loop() {
        let queue = Arc::new(InMemoryQueue::new());
        let (sink, _rx) = RecordingSink::new();
        let token = CancellationToken::new();

        let handle = tokio::spawn(Consumer::new(queue.clone(), sink, token.clone()).run());
        token.cancel();
        handle.await.unwrap().unwrap();

        assert!(queue.publish(b"x").await.is_err(), "queue closed after run");
    }
}
