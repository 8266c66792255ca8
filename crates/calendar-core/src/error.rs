// Error types for the calendar pipeline

use thiserror::Error;

/// Result type alias for calendar operations
pub type Result<T> = std::result::Result<T, CalendarError>;

/// Errors that can occur across the calendar pipeline
#[derive(Debug, Error)]
pub enum CalendarError {
    /// Referenced event id does not exist; never retried
    #[error("no such event: {0}")]
    NotFound(i64),

    /// I/O failure from the persistence backend
    #[error("storage error: {0}")]
    Storage(String),

    /// Queue publish failure
    #[error("publish error: {0}")]
    Publish(String),

    /// Queue connection or receive failure
    #[error("consume error: {0}")]
    Consume(String),

    /// Notification sink failure
    #[error("sink error: {0}")]
    Sink(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl CalendarError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        CalendarError::Storage(msg.into())
    }

    /// Create a publish error
    pub fn publish(msg: impl Into<String>) -> Self {
        CalendarError::Publish(msg.into())
    }

    /// Create a consume error
    pub fn consume(msg: impl Into<String>) -> Self {
        CalendarError::Consume(msg.into())
    }

    /// Create a sink error
    pub fn sink(msg: impl Into<String>) -> Self {
        CalendarError::Sink(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        CalendarError::Config(msg.into())
    }

    /// True for errors the API layer maps to 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, CalendarError::NotFound(_))
    }
}
