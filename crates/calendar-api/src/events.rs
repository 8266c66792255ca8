// Event CRUD HTTP routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use calendar_core::{Event, EventDraft};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

use crate::common::{ok, ApiError, ApiResponse, IdResponse};
use crate::services::EventService;

/// App state for event routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EventService>,
}

impl AppState {
    pub fn new(store: Arc<dyn calendar_core::EventStore>) -> Self {
        Self {
            service: Arc::new(EventService::new(store)),
        }
    }
}

/// Create event routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/listEventsByDay", get(list_events_by_day))
        .route("/api/v1/listEventsByWeek", get(list_events_by_week))
        .route("/api/v1/listEventsByMonth", get(list_events_by_month))
        .route("/api/v1/addEvent", post(add_event))
        .route("/api/v1/editEvent/:id", post(edit_event))
        .route("/api/v1/deleteEvent/:id", get(delete_event))
        .route("/api/v1/getEvent/:id", get(get_event))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    date: Option<String>,
}

impl DateQuery {
    fn parse(&self) -> Result<NaiveDate, ApiError> {
        self.date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .ok_or_else(|| ApiError::bad_request("invalid or empty date"))
    }
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request("invalid or empty id"))
}

/// GET /api/v1/listEventsByDay?date=YYYY-MM-DD
#[utoipa::path(
    get,
    path = "/api/v1/listEventsByDay",
    params(("date" = String, Query, description = "Window start, YYYY-MM-DD")),
    responses(
        (status = 200, description = "Events starting within one day", body = ApiResponse<Vec<Event>>),
        (status = 400, description = "Invalid or missing date"),
        (status = 500, description = "Storage failure")
    ),
    tag = "events"
)]
pub async fn list_events_by_day(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<Event>>>), ApiError> {
    let events = state.service.list_by_day(query.parse()?).await?;
    Ok(ok(events))
}

/// GET /api/v1/listEventsByWeek?date=YYYY-MM-DD
#[utoipa::path(
    get,
    path = "/api/v1/listEventsByWeek",
    params(("date" = String, Query, description = "Window start, YYYY-MM-DD")),
    responses(
        (status = 200, description = "Events starting within seven days", body = ApiResponse<Vec<Event>>),
        (status = 400, description = "Invalid or missing date"),
        (status = 500, description = "Storage failure")
    ),
    tag = "events"
)]
pub async fn list_events_by_week(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<Event>>>), ApiError> {
    let events = state.service.list_by_week(query.parse()?).await?;
    Ok(ok(events))
}

/// GET /api/v1/listEventsByMonth?date=YYYY-MM-DD
#[utoipa::path(
    get,
    path = "/api/v1/listEventsByMonth",
    params(("date" = String, Query, description = "Window start, YYYY-MM-DD")),
    responses(
        (status = 200, description = "Events starting within one calendar month", body = ApiResponse<Vec<Event>>),
        (status = 400, description = "Invalid or missing date"),
        (status = 500, description = "Storage failure")
    ),
    tag = "events"
)]
pub async fn list_events_by_month(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<Event>>>), ApiError> {
    let events = state.service.list_by_month(query.parse()?).await?;
    Ok(ok(events))
}

/// POST /api/v1/addEvent
#[utoipa::path(
    post,
    path = "/api/v1/addEvent",
    request_body = EventDraft,
    responses(
        (status = 200, description = "Event created, id returned", body = ApiResponse<IdResponse>),
        (status = 500, description = "Storage failure")
    ),
    tag = "events"
)]
pub async fn add_event(
    State(state): State<AppState>,
    Json(draft): Json<EventDraft>,
) -> Result<(StatusCode, Json<ApiResponse<IdResponse>>), ApiError> {
    let id = state.service.create(draft).await?;
    Ok(ok(IdResponse { id }))
}

/// POST /api/v1/editEvent/{id}
#[utoipa::path(
    post,
    path = "/api/v1/editEvent/{id}",
    params(("id" = i64, Path, description = "Event id")),
    request_body = EventDraft,
    responses(
        (status = 200, description = "Event updated", body = ApiResponse<IdResponse>),
        (status = 400, description = "Invalid id"),
        (status = 404, description = "No such event"),
        (status = 500, description = "Storage failure")
    ),
    tag = "events"
)]
pub async fn edit_event(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Json(draft): Json<EventDraft>,
) -> Result<(StatusCode, Json<ApiResponse<IdResponse>>), ApiError> {
    let id = parse_id(&raw_id)?;
    state.service.update(id, draft).await?;
    Ok(ok(IdResponse { id }))
}

/// GET /api/v1/deleteEvent/{id}
#[utoipa::path(
    get,
    path = "/api/v1/deleteEvent/{id}",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event removed", body = ApiResponse<IdResponse>),
        (status = 400, description = "Invalid id"),
        (status = 404, description = "No such event"),
        (status = 500, description = "Storage failure")
    ),
    tag = "events"
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<IdResponse>>), ApiError> {
    let id = parse_id(&raw_id)?;
    state.service.delete(id).await?;
    Ok(ok(IdResponse { id }))
}

/// GET /api/v1/getEvent/{id}
#[utoipa::path(
    get,
    path = "/api/v1/getEvent/{id}",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event found", body = ApiResponse<Event>),
        (status = 400, description = "Invalid id"),
        (status = 404, description = "No such event"),
        (status = 500, description = "Storage failure")
    ),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Event>>), ApiError> {
    let id = parse_id(&raw_id)?;
    let event = state.service.get(id).await?;
    Ok(ok(event))
}
