// Calendar API server

mod common;
mod events;
mod services;

use anyhow::{Context, Result};
use axum::{routing::get, Json, Router};
use calendar_core::{Event, EventDraft};
use common::{ApiResponse, IdResponse};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    storage_mode: String,
}

async fn health(
    axum::extract::State(state): axum::extract::State<HealthState>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        storage_mode: state.storage_mode.clone(),
    })
}

/// State for health endpoint
#[derive(Clone)]
struct HealthState {
    storage_mode: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        events::list_events_by_day,
        events::list_events_by_week,
        events::list_events_by_month,
        events::add_event,
        events::edit_event,
        events::delete_event,
        events::get_event,
    ),
    components(
        schemas(
            Event, EventDraft, IdResponse,
            ApiResponse<Event>,
            ApiResponse<IdResponse>,
        )
    ),
    tags(
        (name = "events", description = "Event management endpoints")
    ),
    info(
        title = "Calendar API",
        version = "0.1.0",
        description = "CRUD and window queries over calendar events",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "calendar_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("calendar-api starting...");

    let storage_mode = calendar_storage::StorageMode::from_env();
    let store = calendar_storage::event_store_from_env()
        .await
        .context("failed to build event store")?;

    let events_state = events::AppState::new(store);
    let health_state = HealthState {
        storage_mode: format!("{storage_mode:?}"),
    };

    let app = Router::new()
        .route("/health", get(health).with_state(health_state))
        .merge(events::routes(events_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http());

    let port: u16 = std::env::var("HTTP_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("terminated by signal...");
    }
}
