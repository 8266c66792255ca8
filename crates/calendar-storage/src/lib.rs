// Postgres storage layer with sqlx
//
// This crate provides the database implementation of the core EventStore
// trait: DbEventStore over a Database repository.

pub mod bootstrap;
pub mod event_store;
pub mod models;
pub mod repositories;

pub use bootstrap::{event_store_from_env, StorageMode};
pub use event_store::DbEventStore;
pub use models::*;
pub use repositories::*;
