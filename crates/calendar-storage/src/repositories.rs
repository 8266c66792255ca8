// Repository layer for database operations

use anyhow::Result;
use calendar_core::EventDraft;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::EventRow;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply pending migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    // ============================================
    // Events
    // ============================================

    /// Highest id currently stored, if any. Seeds the in-process allocator.
    pub async fn max_event_id(&self) -> Result<Option<i64>> {
        let max: Option<i64> = sqlx::query_scalar("SELECT max(id) FROM events")
            .fetch_one(&self.pool)
            .await?;
        Ok(max)
    }

    /// Insert an event with an explicit, caller-allocated id
    pub async fn insert_event(&self, row: &EventRow) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO events (id, title, start_time, duration, description, owner, notify_time, created, updated)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(row.id)
        .bind(&row.title)
        .bind(row.start_time)
        .bind(row.duration)
        .bind(&row.description)
        .bind(row.owner)
        .bind(row.notify_time)
        .bind(row.created)
        .bind(row.updated)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_event(&self, id: i64) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, start_time, duration, description, owner, notify_time, created, updated
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Overwrite the draft fields of an event, refreshing `updated` and
    /// leaving `created` untouched. Returns false when the id is absent.
    pub async fn update_event(&self, id: i64, draft: &EventDraft) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET
                title = $2,
                start_time = $3,
                duration = $4,
                description = $5,
                owner = $6,
                notify_time = $7,
                updated = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&draft.title)
        .bind(draft.start_time)
        .bind(draft.duration)
        .bind(&draft.description)
        .bind(draft.owner)
        .bind(draft.notify_time)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Hard-delete an event. Returns false when the id is absent.
    pub async fn delete_event(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_events(&self) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, start_time, duration, description, owner, notify_time, created, updated
            FROM events
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Events with start_time in the half-open window [from, to)
    pub async fn list_events_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, start_time, duration, description, owner, notify_time, created, updated
            FROM events
            WHERE start_time >= $1 AND start_time < $2
            ORDER BY id
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Events whose notification lead window has been entered as of `now`
    pub async fn list_events_to_notify(&self, now: DateTime<Utc>) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, start_time, duration, description, owner, notify_time, created, updated
            FROM events
            WHERE notify_time <> 0
              AND EXTRACT(EPOCH FROM (start_time - $1)) < notify_time
            ORDER BY id
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
