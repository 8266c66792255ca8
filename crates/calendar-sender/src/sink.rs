// Notification sinks
//
// Terminal consumers of a decoded notification. The webhook sink forwards
// over HTTP; the log sink writes a line and is the default.

use async_trait::async_trait;
use calendar_core::{CalendarError, Notification, Result, Sink};

// ============================================================================
// WebhookSink - HTTP POST to an external receiver
// ============================================================================

/// Posts each notification to `{base_url}/notify` as JSON.
///
/// Only transport-level failures count as sink errors; any HTTP status the
/// receiver answers with is treated as delivered.
pub struct WebhookSink {
    client: reqwest::Client,
    endpoint: String,
}

impl WebhookSink {
    /// Build a sink for the given base URL.
    ///
    /// `accept_invalid_certs` disables TLS certificate verification and
    /// must stay off outside self-signed test rigs.
    pub fn new(base_url: &str, accept_invalid_certs: bool) -> Result<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(|e| CalendarError::sink(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: format!("{}/notify", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl Sink for WebhookSink {
    async fn deliver(&self, notification: &Notification) -> Result<()> {
        self.client
            .post(&self.endpoint)
            .json(notification)
            .send()
            .await
            .map_err(|e| CalendarError::sink(e.to_string()))?;
        Ok(())
    }
}

// ============================================================================
// LogSink - Write each notification as a log line
// ============================================================================

/// Logs notifications instead of forwarding them
pub struct LogSink {
    level: tracing::Level,
}

impl LogSink {
    /// Info-level sink (SENDER_MODE=INFO)
    pub fn info() -> Self {
        Self {
            level: tracing::Level::INFO,
        }
    }

    /// Debug-level sink (the default mode)
    pub fn debug() -> Self {
        Self {
            level: tracing::Level::DEBUG,
        }
    }
}

#[async_trait]
impl Sink for LogSink {
    async fn deliver(&self, notification: &Notification) -> Result<()> {
        match self.level {
            tracing::Level::INFO => tracing::info!("NOTIFICATION: {notification}"),
            _ => tracing::debug!("NOTIFICATION: {notification}"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn notification() -> Notification {
        Notification {
            id: 11,
            title: "review".to_string(),
            event_time: "2026-05-01T10:00:00Z".parse().unwrap(),
            owner: 4,
        }
    }

    #[tokio::test]
    async fn webhook_posts_the_notification_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/notify"))
            .and(body_json(notification()))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let sink = WebhookSink::new(&server.uri(), false).unwrap();
        sink.deliver(&notification()).await.unwrap();
    }

    #[tokio::test]
    async fn webhook_treats_error_statuses_as_delivered() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/notify"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let sink = WebhookSink::new(&server.uri(), false).unwrap();
        assert!(sink.deliver(&notification()).await.is_ok());
    }

    #[tokio::test]
    async fn unreachable_webhook_is_a_sink_error() {
        // nothing listens on this port
        let sink = WebhookSink::new("http://127.0.0.1:1", false).unwrap();
        let err = sink.deliver(&notification()).await;
        assert!(matches!(err, Err(CalendarError::Sink(_))));
    }

    #[tokio::test]
    async fn log_sink_always_succeeds() {
        assert!(LogSink::info().deliver(&notification()).await.is_ok());
        assert!(LogSink::debug().deliver(&notification()).await.is_ok());
    }
}
