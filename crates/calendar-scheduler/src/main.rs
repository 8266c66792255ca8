use std::sync::Arc;

use anyhow::{Context, Result};
use calendar_queue::RedisQueue;
use calendar_scheduler::{Notifier, Scheduler, Settings};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "calendar_scheduler=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("calendar-scheduler starting...");

    let settings = Settings::from_env();
    tracing::info!(
        period = ?settings.scheduler.period,
        queue = %settings.queue,
        suppress_duplicates = settings.scheduler.suppress_duplicates,
        "Scheduler configured"
    );

    let store = calendar_storage::event_store_from_env()
        .await
        .context("failed to build event store")?;

    let queue = RedisQueue::connect(&settings.redis_url, &settings.queue, settings.message_ttl)
        .await
        .context("failed to connect to queue")?;
    let notifier = Notifier::new(Arc::new(queue), settings.notifier.clone());

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("terminated by signal...");
            signal_token.cancel();
        }
    });

    Scheduler::new(store, notifier, settings.scheduler.clone(), shutdown)
        .run()
        .await;

    tracing::info!("Scheduler shutdown complete");
    Ok(())
}
