// Sender binary configuration

use std::time::Duration;

/// How delivered notifications terminate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SenderMode {
    /// Forward to the webhook endpoint over HTTP
    Test,
    /// Log each notification at info level
    Info,
    /// Log each notification at debug level
    #[default]
    Debug,
}

impl SenderMode {
    fn parse(value: &str) -> Self {
        match value {
            "TEST" => SenderMode::Test,
            "INFO" => SenderMode::Info,
            _ => SenderMode::Debug,
        }
    }
}

/// Environment-driven settings for the sender binary
#[derive(Debug, Clone)]
pub struct Settings {
    /// Redis connection string
    pub redis_url: String,
    /// Queue name shared with the scheduler
    pub queue: String,
    /// Optional TTL bounding how long undelivered messages survive
    pub message_ttl: Option<Duration>,
    pub mode: SenderMode,
    /// Base URL the webhook sink posts to (`{webhook_url}/notify`)
    pub webhook_url: String,
    /// Disable TLS certificate verification on the webhook client.
    /// Off by default; only flip this for test rigs with self-signed certs.
    pub accept_invalid_certs: bool,
}

impl Settings {
    /// Create settings from environment variables
    pub fn from_env() -> Self {
        Self {
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            queue: std::env::var("QUEUE_NAME").unwrap_or_else(|_| "notifications".to_string()),
            message_ttl: std::env::var("QUEUE_MESSAGE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&secs| secs != 0)
                .map(Duration::from_secs),
            mode: SenderMode::parse(std::env::var("SENDER_MODE").unwrap_or_default().as_str()),
            webhook_url: std::env::var("WEBHOOK_URL")
                .unwrap_or_else(|_| "http://localhost:3002".to_string()),
            accept_invalid_certs: matches!(
                std::env::var("WEBHOOK_ACCEPT_INVALID_CERTS").as_deref(),
                Ok("1") | Ok("true") | Ok("yes")
            ),
        }
    }
}
