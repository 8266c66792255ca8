use std::sync::Arc;

use anyhow::{Context, Result};
use calendar_core::Sink;
use calendar_queue::RedisQueue;
use calendar_sender::{Consumer, LogSink, SenderMode, Settings, WebhookSink};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "calendar_sender=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("calendar-sender starting...");

    let settings = Settings::from_env();
    tracing::info!(mode = ?settings.mode, queue = %settings.queue, "Sender configured");

    let sink: Arc<dyn Sink> = match settings.mode {
        SenderMode::Test => {
            if settings.accept_invalid_certs {
                tracing::warn!("TLS certificate verification disabled on the webhook client");
            }
            Arc::new(
                WebhookSink::new(&settings.webhook_url, settings.accept_invalid_certs)
                    .context("failed to build webhook client")?,
            )
        }
        SenderMode::Info => Arc::new(LogSink::info()),
        SenderMode::Debug => Arc::new(LogSink::debug()),
    };

    let queue = RedisQueue::connect(&settings.redis_url, &settings.queue, settings.message_ttl)
        .await
        .context("failed to connect to queue")?;

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("terminated by signal...");
            signal_token.cancel();
        }
    });

    Consumer::new(Arc::new(queue), sink, shutdown)
        .run()
        .await
        .context("consumer failed")?;

    tracing::info!("Sender shutdown complete");
    Ok(())
}
