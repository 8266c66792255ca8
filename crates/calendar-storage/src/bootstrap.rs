// Storage backend selection shared by the service binaries

use std::sync::Arc;

use anyhow::{Context, Result};
use calendar_core::{EventStore, InMemoryEventStore};

use crate::event_store::DbEventStore;
use crate::repositories::Database;

/// Which EventStore backend a binary runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    #[default]
    Memory,
    Postgres,
}

impl StorageMode {
    /// Read `STORAGE_MODE` ("memory" | "postgres"), defaulting to memory
    pub fn from_env() -> Self {
        match std::env::var("STORAGE_MODE").as_deref() {
            Ok("postgres") => StorageMode::Postgres,
            _ => StorageMode::Memory,
        }
    }
}

/// Build the configured event store.
///
/// Postgres mode requires `DATABASE_URL` and applies pending migrations
/// before handing the store out.
pub async fn event_store_from_env() -> Result<Arc<dyn EventStore>> {
    match StorageMode::from_env() {
        StorageMode::Memory => {
            tracing::info!("using in-memory event store");
            Ok(Arc::new(InMemoryEventStore::new()))
        }
        StorageMode::Postgres => {
            let url = std::env::var("DATABASE_URL")
                .context("DATABASE_URL required when STORAGE_MODE=postgres")?;
            let db = Database::from_url(&url)
                .await
                .context("failed to connect to database")?;
            db.migrate().await.context("failed to run migrations")?;
            let store = DbEventStore::new(db)
                .await
                .context("failed to seed id allocator")?;
            tracing::info!("using postgres event store");
            Ok(Arc::new(store))
        }
    }
}
