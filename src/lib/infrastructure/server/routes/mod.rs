pub mod clear;
pub mod health;
pub mod query;

use super::dto::ErrorResponse;
use axum::Json;
use axum::http::StatusCode;

pub(super) type ApiError = (StatusCode, Json<ErrorResponse>);

pub(super) fn reject(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse::new(message)))
}
