// Core traits for pluggable backends
//
// These traits let the pipeline run against different backends:
// - In-memory implementations for tests and single-node runs
// - Postgres (calendar-storage) and Redis (calendar-queue) for production

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use crate::event::{Event, EventDraft, Notification};

// ============================================================================
// EventStore - Persisted event records
// ============================================================================

/// Storage contract for calendar events.
///
/// Ids are allocated by the store from a counter that only increases, so an
/// id is never reassigned after a delete. `created` is stamped once on
/// creation; `updated` refreshes on every successful mutation.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Insert a new event, returning its assigned id
    async fn create_event(&self, draft: EventDraft) -> Result<i64>;

    /// Fetch one event; `NotFound` if the id is absent
    async fn get_event(&self, id: i64) -> Result<Event>;

    /// Overwrite the draft fields of an existing event, preserving the
    /// original `created` stamp; `NotFound` if the id is absent
    async fn update_event(&self, id: i64, draft: EventDraft) -> Result<()>;

    /// Hard-remove an event; `NotFound` if the id is absent
    async fn delete_event(&self, id: i64) -> Result<()>;

    /// All stored events, ordered by id
    async fn list_events(&self) -> Result<Vec<Event>>;

    /// Events with `start_time` in `[date, date + 1 day)`
    async fn list_events_by_day(&self, date: NaiveDate) -> Result<Vec<Event>>;

    /// Events with `start_time` in `[date, date + 7 days)`
    async fn list_events_by_week(&self, date: NaiveDate) -> Result<Vec<Event>>;

    /// Events with `start_time` in `[date, date + 1 calendar month)`
    async fn list_events_by_month(&self, date: NaiveDate) -> Result<Vec<Event>>;

    /// Events whose notification lead window has been entered:
    /// `notify_time != 0` and `start_time - now < notify_time` seconds.
    ///
    /// This is a live predicate re-evaluated on every call; the store keeps
    /// no "already notified" marker. Duplicate suppression, when wanted, is
    /// the scheduler's job.
    async fn list_events_to_notify(&self) -> Result<Vec<Event>>;
}

// ============================================================================
// NotificationQueue - Durable fan-out between scheduler and sender
// ============================================================================

/// A named, durable message queue carrying encoded notifications.
///
/// Implementations can:
/// - Keep messages on a Redis list (calendar-queue)
/// - Keep messages on an in-process channel for tests
#[async_trait]
pub trait NotificationQueue: Send + Sync {
    /// Publish one encoded message
    async fn publish(&self, payload: &[u8]) -> Result<()>;

    /// Wait for the next message.
    ///
    /// Returns `Ok(None)` when the queue is closed and drained, or when the
    /// backend's poll window elapsed with nothing pending; callers loop
    /// until cancelled.
    async fn receive(&self) -> Result<Option<Vec<u8>>>;

    /// Close the queue connection. Publishing after close fails; pending
    /// messages stay receivable until drained where the backend allows it.
    async fn close(&self) -> Result<()>;
}

// ============================================================================
// Sink - Terminal consumer of a notification
// ============================================================================

/// Pluggable terminal consumer of a decoded notification.
///
/// Implementations can:
/// - POST to a webhook (calendar-sender)
/// - Write a log line
/// - Collect notifications in memory for tests
#[async_trait]
pub trait Sink: Send + Sync {
    /// Deliver one notification
    async fn deliver(&self, notification: &Notification) -> Result<()>;
}
