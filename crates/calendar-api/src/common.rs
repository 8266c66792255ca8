// Common DTOs for the public API
//
// Every /api/v1 response is wrapped in {data?, error?, code} so clients
// can branch on one envelope shape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use calendar_core::CalendarError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response envelope for all /api/v1 endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub code: u16,
}

/// Id payload returned by the mutating endpoints
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct IdResponse {
    pub id: i64,
}

/// 200 envelope around `data`
pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::OK,
        Json(ApiResponse {
            data: Some(data),
            error: None,
            code: StatusCode::OK.as_u16(),
        }),
    )
}

/// Error envelope carrying a status and message
#[derive(Debug)]
pub struct ApiError {
    pub code: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<CalendarError> for ApiError {
    fn from(err: CalendarError) -> Self {
        let code = if err.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            code,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()> {
            data: None,
            error: Some(self.message),
            code: self.code.as_u16(),
        };
        (self.code, Json(body)).into_response()
    }
}
