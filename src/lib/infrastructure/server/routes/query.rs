use super::super::dto::{ErrorResponse, QueryRequest, QueryResponse};
use super::super::state::ServerState;
use super::{ApiError, reject};
use crate::infrastructure::model::ModelProvider;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use std::sync::Arc;
use tracing::{error, info, warn};

pub(crate) const MISSING_FIELDS: &str = "Both 'sender' and 'query' are required";

#[utoipa::path(
    post,
    path = "/query",
    tag = "conversation",
    request_body = QueryRequest,
    responses(
        (status = 200, description = "Message routed and answered", body = QueryResponse),
        (status = 400, description = "Missing sender or query", body = ErrorResponse),
        (status = 500, description = "Unexpected internal failure", body = ErrorResponse)
    )
)]
pub async fn query_handler<P: ModelProvider + 'static>(
    State(state): State<Arc<ServerState<P>>>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejecting /query request with invalid body");
        reject(StatusCode::BAD_REQUEST, MISSING_FIELDS)
    })?;

    let (Some(sender), Some(query)) = (
        request.sender.filter(|s| !s.trim().is_empty()),
        request.query.filter(|q| !q.trim().is_empty()),
    ) else {
        warn!("Rejecting /query request without sender or query");
        return Err(reject(StatusCode::BAD_REQUEST, MISSING_FIELDS));
    };

    info!(sender = sender.as_str(), "Received /query request");
    let orchestrator = state.orchestrator().clone();
    let task = tokio::spawn(async move { orchestrator.route(&sender, &query).await });

    match task.await {
        Ok(response) if !response.trim().is_empty() => Ok(Json(QueryResponse {
            success: true,
            response,
        })),
        Ok(_) => {
            error!("Routing produced an empty response");
            Err(reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                "The assistant returned an empty response",
            ))
        }
        Err(join_error) => {
            error!(error = %join_error, "Routing task failed");
            Err(reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal error occurred while processing the query",
            ))
        }
    }
}
