// Scheduler binary configuration

use std::time::Duration;

use crate::notifier::NotifierConfig;
use crate::scheduler::SchedulerConfig;

/// Environment-driven settings for the scheduler binary
#[derive(Debug, Clone)]
pub struct Settings {
    /// Redis connection string
    pub redis_url: String,
    /// Queue name shared with the sender
    pub queue: String,
    /// Optional TTL bounding how long undelivered messages survive
    pub message_ttl: Option<Duration>,
    pub scheduler: SchedulerConfig,
    pub notifier: NotifierConfig,
}

impl Settings {
    /// Create settings from environment variables
    pub fn from_env() -> Self {
        let scheduler = SchedulerConfig {
            period: Duration::from_secs(env_u64("SCHEDULER_PERIOD_SECS", 60)),
            suppress_duplicates: env_bool("SUPPRESS_DUPLICATES"),
        };
        let notifier = NotifierConfig {
            attempts: env_u64("PUBLISH_ATTEMPTS", 5) as u32,
            retry_backoff: Duration::from_millis(env_u64("PUBLISH_RETRY_BACKOFF_MS", 0)),
        };
        Self {
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            queue: std::env::var("QUEUE_NAME").unwrap_or_else(|_| "notifications".to_string()),
            message_ttl: std::env::var("QUEUE_MESSAGE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&secs| secs != 0)
                .map(Duration::from_secs),
            scheduler,
            notifier,
        }
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_bool(name: &str) -> bool {
    matches!(
        std::env::var(name).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}
