// In-memory implementations for tests and single-node runs
//
// These implementations keep all data in memory, making them perfect for:
// - The contract test suite
// - Single-process deployments that don't need Postgres or Redis
// - Quick prototyping

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::{mpsc, Mutex, RwLock};

use crate::error::{CalendarError, Result};
use crate::event::{day_bounds, month_bounds, week_bounds, Event, EventDraft};
use crate::traits::{EventStore, NotificationQueue};

// ============================================================================
// InMemoryEventStore - Stores events in memory
// ============================================================================

/// In-memory event store.
///
/// Events live in a HashMap keyed by id; the id counter and the map share
/// one RwLock, so every mutation takes the write lock and every scan takes
/// the read lock. The counter only increases, even across deletes.
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug)]
struct Inner {
    next_id: i64,
    events: HashMap<i64, Event>,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            next_id: 1,
            events: HashMap::new(),
        }
    }
}

impl InMemoryEventStore {
    /// Create a new in-memory event store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored events
    pub async fn len(&self) -> usize {
        self.inner.read().await.events.len()
    }

    /// True when no events are stored
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.events.is_empty()
    }

    async fn list_range(
        &self,
        from: chrono::DateTime<Utc>,
        to: chrono::DateTime<Utc>,
    ) -> Vec<Event> {
        let inner = self.inner.read().await;
        let mut events: Vec<Event> = inner
            .events
            .values()
            .filter(|e| e.start_time >= from && e.start_time < to)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.id);
        events
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn create_event(&self, draft: EventDraft) -> Result<i64> {
        let now = Utc::now();
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;
        inner.events.insert(
            id,
            Event {
                id,
                title: draft.title,
                description: draft.description,
                start_time: draft.start_time,
                duration: draft.duration,
                owner: draft.owner,
                notify_time: draft.notify_time,
                created: now,
                updated: now,
            },
        );
        tracing::trace!(id, "added event");
        Ok(id)
    }

    async fn get_event(&self, id: i64) -> Result<Event> {
        self.inner
            .read()
            .await
            .events
            .get(&id)
            .cloned()
            .ok_or(CalendarError::NotFound(id))
    }

    async fn update_event(&self, id: i64, draft: EventDraft) -> Result<()> {
        let mut inner = self.inner.write().await;
        let existing = inner.events.get(&id).ok_or(CalendarError::NotFound(id))?;
        let created = existing.created;
        inner.events.insert(
            id,
            Event {
                id,
                title: draft.title,
                description: draft.description,
                start_time: draft.start_time,
                duration: draft.duration,
                owner: draft.owner,
                notify_time: draft.notify_time,
                created,
                updated: Utc::now(),
            },
        );
        tracing::trace!(id, "modified event");
        Ok(())
    }

    async fn delete_event(&self, id: i64) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner
            .events
            .remove(&id)
            .ok_or(CalendarError::NotFound(id))?;
        tracing::trace!(id, "removed event");
        Ok(())
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let inner = self.inner.read().await;
        let mut events: Vec<Event> = inner.events.values().cloned().collect();
        events.sort_by_key(|e| e.id);
        Ok(events)
    }

    async fn list_events_by_day(&self, date: NaiveDate) -> Result<Vec<Event>> {
        let (from, to) = day_bounds(date);
        Ok(self.list_range(from, to).await)
    }

    async fn list_events_by_week(&self, date: NaiveDate) -> Result<Vec<Event>> {
        let (from, to) = week_bounds(date);
        Ok(self.list_range(from, to).await)
    }

    async fn list_events_by_month(&self, date: NaiveDate) -> Result<Vec<Event>> {
        let (from, to) = month_bounds(date);
        Ok(self.list_range(from, to).await)
    }

    async fn list_events_to_notify(&self) -> Result<Vec<Event>> {
        let now = Utc::now();
        let inner = self.inner.read().await;
        let mut events: Vec<Event> = inner
            .events
            .values()
            .filter(|e| e.notify_time != 0 && (e.start_time - now).num_seconds() < e.notify_time)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.id);
        Ok(events)
    }
}

// ============================================================================
// InMemoryQueue - In-process notification queue
// ============================================================================

/// In-memory notification queue backed by an unbounded channel.
///
/// Stands in for the Redis queue in tests and single-process deployments.
/// `close()` drops the sender; pending messages stay receivable until the
/// channel drains, after which `receive` returns `Ok(None)`.
pub struct InMemoryQueue {
    tx: Mutex<Option<mpsc::UnboundedSender<Vec<u8>>>>,
    rx: Mutex<mpsc::UnboundedReceiver<Vec<u8>>>,
}

impl InMemoryQueue {
    /// Create a new in-memory queue
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx: Mutex::new(Some(tx)),
            rx: Mutex::new(rx),
        }
    }
}

impl Default for InMemoryQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationQueue for InMemoryQueue {
    async fn publish(&self, payload: &[u8]) -> Result<()> {
        let tx = self.tx.lock().await;
        match tx.as_ref() {
            Some(tx) => tx
                .send(payload.to_vec())
                .map_err(|_| CalendarError::publish("queue closed")),
            None => Err(CalendarError::publish("queue closed")),
        }
    }

    async fn receive(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.rx.lock().await.recv().await)
    }

    async fn close(&self) -> Result<()> {
        self.tx.lock().await.take();
        Ok(())
    }
}
