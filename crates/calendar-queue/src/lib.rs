// Redis-backed notification queue
//
// One named list per queue under the `calendar:queue:` namespace. Publish
// is LPUSH (+ an optional TTL refresh standing in for declare-time message
// TTL), receive is BRPOP with a short block so callers can re-check their
// cancellation signal between polls. The list is durable and shared:
// producers and consumers connect to the same name independently.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tokio::sync::Mutex;

use calendar_core::{CalendarError, NotificationQueue, Result};

const KEY_PREFIX: &str = "calendar:queue:";

/// How long one BRPOP blocks before receive() reports an empty poll
const POLL_BLOCK: Duration = Duration::from_secs(1);

/// Redis list acting as the durable notification queue
pub struct RedisQueue {
    conn: Mutex<Option<MultiplexedConnection>>,
    key: String,
    ttl: Option<Duration>,
}

impl RedisQueue {
    /// Connect to Redis and bind to the named queue.
    ///
    /// `ttl`, when set, bounds how long undelivered messages survive; it is
    /// refreshed on every publish.
    pub async fn connect(url: &str, queue: &str, ttl: Option<Duration>) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| CalendarError::consume(format!("invalid redis url: {e}")))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CalendarError::consume(format!("failed to connect to redis: {e}")))?;

        tracing::debug!(queue, "connected to redis queue");
        Ok(Self {
            conn: Mutex::new(Some(conn)),
            key: format!("{KEY_PREFIX}{queue}"),
            ttl,
        })
    }
}

#[async_trait]
impl NotificationQueue for RedisQueue {
    async fn publish(&self, payload: &[u8]) -> Result<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard
            .as_mut()
            .ok_or_else(|| CalendarError::publish("queue closed"))?;

        conn.lpush::<_, _, ()>(&self.key, payload)
            .await
            .map_err(|e| CalendarError::publish(e.to_string()))?;

        if let Some(ttl) = self.ttl {
            conn.expire::<_, ()>(&self.key, ttl.as_secs() as i64)
                .await
                .map_err(|e| CalendarError::publish(e.to_string()))?;
        }
        Ok(())
    }

    async fn receive(&self) -> Result<Option<Vec<u8>>> {
        let mut guard = self.conn.lock().await;
        let Some(conn) = guard.as_mut() else {
            return Ok(None);
        };

        // BRPOP returns (key, payload) or nil on timeout
        let popped: Option<(String, Vec<u8>)> = conn
            .brpop(&self.key, POLL_BLOCK.as_secs_f64())
            .await
            .map_err(|e| CalendarError::consume(e.to_string()))?;

        Ok(popped.map(|(_, payload)| payload))
    }

    async fn close(&self) -> Result<()> {
        self.conn.lock().await.take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Requires a live Redis:
    //   REDIS_URL=redis://localhost:6379 cargo test -p calendar-queue -- --ignored
    #[tokio::test]
    #[ignore]
    async fn publish_receive_roundtrip() {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".into());
        let queue = RedisQueue::connect(&url, "test-roundtrip", None).await.unwrap();

        queue.publish(b"first").await.unwrap();
        queue.publish(b"second").await.unwrap();

        assert_eq!(queue.receive().await.unwrap(), Some(b"first".to_vec()));
        assert_eq!(queue.receive().await.unwrap(), Some(b"second".to_vec()));
        assert_eq!(queue.receive().await.unwrap(), None);

        queue.close().await.unwrap();
        assert!(queue.publish(b"after-close").await.is_err());
    }
}
