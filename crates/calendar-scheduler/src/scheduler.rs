// Scheduler - periodic due-event scan
//
// Single task racing a tick interval against the shared cancellation
// token. Each tick re-evaluates the store's live due predicate; a failed
// scan skips the tick and self-heals on the next one. On shutdown the loop
// stops ticking first and only then closes the queue it owns.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use calendar_core::{Event, EventStore};
use tokio_util::sync::CancellationToken;

use crate::notifier::Notifier;

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Tick period between due-event scans
    pub period: Duration,
    /// Publish each due event at most once while it stays in its lead
    /// window. Off by default: the store keeps no "already notified"
    /// marker, so the faithful behavior is to re-publish every tick.
    pub suppress_duplicates: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(60),
            suppress_duplicates: false,
        }
    }
}

/// Periodic loop feeding due events to the Notifier
pub struct Scheduler {
    store: Arc<dyn EventStore>,
    notifier: Notifier,
    config: SchedulerConfig,
    shutdown: CancellationToken,
    published: HashSet<i64>,
}

impl Scheduler {
    pub fn new(
        store: Arc<dyn EventStore>,
        notifier: Notifier,
        config: SchedulerConfig,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            store,
            notifier,
            config,
            shutdown,
            published: HashSet::new(),
        }
    }

    /// Run until the cancellation token fires
    pub async fn run(mut self) {
        let shutdown = self.shutdown.clone();
        let mut ticker = tokio::time::interval(self.config.period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => self.tick().await,
            }
        }

        // stop producing before closing the queue connection
        drop(ticker);
        if let Err(e) = self.notifier.close().await {
            tracing::warn!(error = %e, "failed to disconnect from queue properly");
        }
        tracing::debug!("scheduler stopped");
    }

    async fn tick(&mut self) {
        let events = match self.store.list_events_to_notify().await {
            Ok(events) => events,
            Err(e) => {
                // transient store outage: drop this tick, the predicate is
                // re-evaluated on the next one
                tracing::warn!(error = %e, "failed to retrieve events for notification");
                return;
            }
        };

        let batch = self.filter_batch(events);
        if !batch.is_empty() {
            self.notifier.notify(&batch).await;
        }
    }

    fn filter_batch(&mut self, events: Vec<Event>) -> Vec<Event> {
        if !self.config.suppress_duplicates {
            return events;
        }

        // prune ids that left the due list so a rescheduled event can
        // notify again
        let due: HashSet<i64> = events.iter().map(|e| e.id).collect();
        self.published.retain(|id| due.contains(id));

        let fresh: Vec<Event> = events
            .into_iter()
            .filter(|e| !self.published.contains(&e.id))
            .collect();
        self.published.extend(fresh.iter().map(|e| e.id));
        fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::NotifierConfig;
    use calendar_core::{
        EventDraft, InMemoryEventStore, InMemoryQueue, Notification, NotificationQueue,
    };
    use chrono::Utc;

    fn draft(title: &str, offset_secs: i64, notify_time: i64) -> EventDraft {
        EventDraft {
            title: title.to_string(),
            description: String::new(),
            start_time: Utc::now() + chrono::Duration::seconds(offset_secs),
            duration: 3600,
            owner: 3,
            notify_time,
        }
    }

    fn spawn_scheduler(
        store: Arc<InMemoryEventStore>,
        queue: Arc<InMemoryQueue>,
        suppress_duplicates: bool,
    ) -> (CancellationToken, tokio::task::JoinHandle<()>) {
        let token = CancellationToken::new();
        let scheduler = Scheduler::new(
            store,
            Notifier::new(queue, NotifierConfig::default()),
            SchedulerConfig {
                period: Duration::from_millis(10),
                suppress_duplicates,
            },
            token.clone(),
        );
        (token, tokio::spawn(scheduler.run()))
    }

    async fn recv(queue: &InMemoryQueue) -> Option<Notification> {
        let payload = tokio::time::timeout(Duration::from_millis(200), queue.receive())
            .await
            .ok()?
            .unwrap()?;
        Some(serde_json::from_slice(&payload).unwrap())
    }

    #[tokio::test]
    async fn due_event_is_enqueued_on_the_next_tick() {
        let store = Arc::new(InMemoryEventStore::new());
        let queue = Arc::new(InMemoryQueue::new());
        let id = store.create_event(draft("due", 50, 100)).await.unwrap();
        let event = store.get_event(id).await.unwrap();

        let (token, handle) = spawn_scheduler(store.clone(), queue.clone(), false);

        let notification = recv(&queue).await.expect("notification within one tick");
        assert_eq!(notification.id, id);
        assert_eq!(notification.title, "due");
        assert_eq!(notification.owner, 3);
        assert_eq!(notification.event_time, event.start_time);

        token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn zero_notify_time_never_reaches_the_queue() {
        let store = Arc::new(InMemoryEventStore::new());
        let queue = Arc::new(InMemoryQueue::new());
        store.create_event(draft("silent", 1, 0)).await.unwrap();

        let (token, handle) = spawn_scheduler(store.clone(), queue.clone(), false);

        tokio::time::sleep(Duration::from_millis(100)).await;
        token.cancel();
        handle.await.unwrap();
        // scheduler closed its queue on shutdown; a drained closed queue
        // yields None rather than a message
        assert_eq!(queue.receive().await.unwrap(), None);
    }

    #[tokio::test]
    async fn without_suppression_a_due_event_repeats_every_tick() {
        let store = Arc::new(InMemoryEventStore::new());
        let queue = Arc::new(InMemoryQueue::new());
        store.create_event(draft("repeat", 50, 100)).await.unwrap();

        let (token, handle) = spawn_scheduler(store.clone(), queue.clone(), false);

        let first = recv(&queue).await.expect("first tick");
        let second = recv(&queue).await.expect("second tick");
        assert_eq!(first, second);

        token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn suppression_publishes_a_due_event_once() {
        let store = Arc::new(InMemoryEventStore::new());
        let queue = Arc::new(InMemoryQueue::new());
        let id = store.create_event(draft("once", 50, 100)).await.unwrap();

        let (token, handle) = spawn_scheduler(store.clone(), queue.clone(), true);

        let first = recv(&queue).await.expect("published once");
        assert_eq!(first.id, id);
        assert!(recv(&queue).await.is_none(), "no duplicate on later ticks");

        token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn shutdown_stops_ticking_and_closes_the_queue() {
        let store = Arc::new(InMemoryEventStore::new());
        let queue = Arc::new(InMemoryQueue::new());

        let (token, handle) = spawn_scheduler(store.clone(), queue.clone(), false);
        token.cancel();
        handle.await.unwrap();

        assert!(queue.publish(b"x").await.is_err(), "queue closed after run");
    }
}
