// Database-backed EventStore implementation
//
// This module implements the core EventStore trait on top of the Database
// repository. Row consistency is the database's job; id allocation stays in
// process behind a lock, seeded from max(id)+1 at startup, so concurrent
// creates never collide and ids keep increasing across restarts.

use async_trait::async_trait;
use calendar_core::{
    event::{day_bounds, month_bounds, week_bounds},
    CalendarError, Event, EventDraft, EventStore, Result,
};
use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;

use crate::models::EventRow;
use crate::repositories::Database;

/// Postgres-backed event store
pub struct DbEventStore {
    db: Database,
    next_id: Mutex<i64>,
}

impl DbEventStore {
    /// Create a store over an existing connection, seeding the id allocator
    /// from the table's current maximum
    pub async fn new(db: Database) -> anyhow::Result<Self> {
        let next_id = db.max_event_id().await?.map_or(1, |max| max + 1);
        Ok(Self {
            db,
            next_id: Mutex::new(next_id),
        })
    }

    async fn list_between(
        &self,
        from: chrono::DateTime<Utc>,
        to: chrono::DateTime<Utc>,
    ) -> Result<Vec<Event>> {
        let rows = self
            .db
            .list_events_between(from, to)
            .await
            .map_err(|e| CalendarError::storage(e.to_string()))?;
        Ok(rows.into_iter().map(Event::from).collect())
    }
}

#[async_trait]
impl EventStore for DbEventStore {
    async fn create_event(&self, draft: EventDraft) -> Result<i64> {
        let now = Utc::now();
        // Hold the allocator lock across the insert; the counter advances
        // only after the row is durably written.
        let mut next_id = self.next_id.lock().await;
        let id = *next_id;
        let row = EventRow {
            id,
            title: draft.title,
            start_time: draft.start_time,
            duration: draft.duration,
            description: draft.description,
            owner: draft.owner,
            notify_time: draft.notify_time,
            created: now,
            updated: now,
        };
        self.db
            .insert_event(&row)
            .await
            .map_err(|e| CalendarError::storage(e.to_string()))?;
        *next_id += 1;
        tracing::trace!(id, "added event");
        Ok(id)
    }

    async fn get_event(&self, id: i64) -> Result<Event> {
        let row = self
            .db
            .get_event(id)
            .await
            .map_err(|e| CalendarError::storage(e.to_string()))?;
        row.map(Event::from).ok_or(CalendarError::NotFound(id))
    }

    async fn update_event(&self, id: i64, draft: EventDraft) -> Result<()> {
        let updated = self
            .db
            .update_event(id, &draft)
            .await
            .map_err(|e| CalendarError::storage(e.to_string()))?;
        if !updated {
            return Err(CalendarError::NotFound(id));
        }
        tracing::trace!(id, "modified event");
        Ok(())
    }

    async fn delete_event(&self, id: i64) -> Result<()> {
        let deleted = self
            .db
            .delete_event(id)
            .await
            .map_err(|e| CalendarError::storage(e.to_string()))?;
        if !deleted {
            return Err(CalendarError::NotFound(id));
        }
        tracing::trace!(id, "removed event");
        Ok(())
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let rows = self
            .db
            .list_events()
            .await
            .map_err(|e| CalendarError::storage(e.to_string()))?;
        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn list_events_by_day(&self, date: NaiveDate) -> Result<Vec<Event>> {
        let (from, to) = day_bounds(date);
        self.list_between(from, to).await
    }

    async fn list_events_by_week(&self, date: NaiveDate) -> Result<Vec<Event>> {
        let (from, to) = week_bounds(date);
        self.list_between(from, to).await
    }

    async fn list_events_by_month(&self, date: NaiveDate) -> Result<Vec<Event>> {
        let (from, to) = month_bounds(date);
        self.list_between(from, to).await
    }

    async fn list_events_to_notify(&self) -> Result<Vec<Event>> {
        let rows = self
            .db
            .list_events_to_notify(Utc::now())
            .await
            .map_err(|e| CalendarError::storage(e.to_string()))?;
        Ok(rows.into_iter().map(Event::from).collect())
    }
}
