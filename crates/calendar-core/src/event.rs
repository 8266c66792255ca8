// Event and Notification entity types

use chrono::{DateTime, Days, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// A calendar event as stored by an [`EventStore`](crate::traits::EventStore).
///
/// `id`, `created` and `updated` are owned by the store and never set by
/// callers; everything else comes from an [`EventDraft`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    /// Seconds the event occupies
    pub duration: i64,
    /// Opaque owning-user identifier
    pub owner: i64,
    /// Seconds before `start_time` at which a notification should fire;
    /// 0 means "never notify"
    pub notify_time: i64,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Event {
    /// Build the ephemeral notification for this event
    pub fn notification(&self) -> Notification {
        Notification {
            id: self.id,
            title: self.title.clone(),
            event_time: self.start_time,
            owner: self.owner,
        }
    }
}

/// Caller-supplied fields for creating or updating an event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct EventDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub owner: i64,
    #[serde(default)]
    pub notify_time: i64,
}

/// Ephemeral message derived from a due event.
///
/// Built by the scheduler, JSON-encoded onto the queue, decoded by the
/// consumer and handed to a sink. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub event_time: DateTime<Utc>,
    pub owner: i64,
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "id: {}, title: {}, time: {}, owner: {}",
            self.id,
            self.title,
            self.event_time.format("%Y-%m-%d %H:%M:%S"),
            self.owner
        )
    }
}

// ============================================================================
// Query windows
// ============================================================================
//
// All list windows are half-open: inclusive lower bound, exclusive upper.

/// `[date, date + 1 day)`
pub fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    bounds(date, date + Days::new(1))
}

/// `[date, date + 7 days)`
pub fn week_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    bounds(date, date + Days::new(7))
}

/// `[date, date + 1 calendar month)`
pub fn month_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    bounds(date, date + Months::new(1))
}

fn bounds(from: NaiveDate, to: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    (
        from.and_time(NaiveTime::MIN).and_utc(),
        to.and_time(NaiveTime::MIN).and_utc(),
    )
}
