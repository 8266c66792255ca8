// Database models (internal, may differ from the domain types)

use calendar_core::Event;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: i64,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub duration: i64,
    pub description: String,
    pub owner: i64,
    pub notify_time: i64,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: row.id,
            title: row.title,
            description: row.description,
            start_time: row.start_time,
            duration: row.duration,
            owner: row.owner,
            notify_time: row.notify_time,
            created: row.created,
            updated: row.updated,
        }
    }
}
