use super::super::dto::{ClearRequest, ClearResponse, ErrorResponse};
use super::super::state::ServerState;
use super::{ApiError, reject};
use crate::infrastructure::model::ModelProvider;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) const MISSING_SENDER: &str = "'sender' is required";

#[utoipa::path(
    post,
    path = "/clear",
    tag = "conversation",
    request_body = ClearRequest,
    responses(
        (status = 200, description = "History cleared, or nothing to clear", body = ClearResponse),
        (status = 400, description = "Missing sender", body = ErrorResponse)
    )
)]
pub async fn clear_handler<P: ModelProvider + 'static>(
    State(state): State<Arc<ServerState<P>>>,
    payload: Result<Json<ClearRequest>, JsonRejection>,
) -> Result<Json<ClearResponse>, ApiError> {
    let sender = payload
        .ok()
        .and_then(|Json(request)| request.sender)
        .filter(|sender| !sender.trim().is_empty())
        .ok_or_else(|| {
            warn!("Rejecting /clear request without sender");
            reject(StatusCode::BAD_REQUEST, MISSING_SENDER)
        })?;

    let cleared = state.orchestrator().clear(&sender).await;
    info!(sender = sender.as_str(), cleared, "Handled /clear request");

    Ok(Json(ClearResponse {
        success: true,
        message: if cleared {
            "History cleared".to_string()
        } else {
            "No history found".to_string()
        },
    }))
}
