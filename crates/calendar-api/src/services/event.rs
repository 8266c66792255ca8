// Event service - the application façade over the store
//
// Thin orchestration with no business rules of its own; the HTTP layer
// talks to this, never to the store directly.

use std::sync::Arc;

use calendar_core::{Event, EventDraft, EventStore, Result};
use chrono::NaiveDate;

pub struct EventService {
    store: Arc<dyn EventStore>,
}

impl EventService {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, draft: EventDraft) -> Result<i64> {
        self.store.create_event(draft).await
    }

    pub async fn get(&self, id: i64) -> Result<Event> {
        self.store.get_event(id).await
    }

    pub async fn update(&self, id: i64, draft: EventDraft) -> Result<()> {
        self.store.update_event(id, draft).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.store.delete_event(id).await
    }

    pub async fn list_by_day(&self, date: NaiveDate) -> Result<Vec<Event>> {
        self.store.list_events_by_day(date).await
    }

    pub async fn list_by_week(&self, date: NaiveDate) -> Result<Vec<Event>> {
        self.store.list_events_by_week(date).await
    }

    pub async fn list_by_month(&self, date: NaiveDate) -> Result<Vec<Event>> {
        self.store.list_events_by_month(date).await
    }
}
