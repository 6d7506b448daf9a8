use super::super::dto::HealthResponse;
use super::super::state::ServerState;
use crate::infrastructure::model::ModelProvider;
use axum::Json;
use axum::extract::State;
use std::sync::Arc;
use tracing::debug;

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_handler<P: ModelProvider + 'static>(
    State(state): State<Arc<ServerState<P>>>,
) -> Json<HealthResponse> {
    let active_conversations = state.orchestrator().active_conversations().await;
    debug!(active_conversations, "Serving /health request");
    Json(HealthResponse {
        status: "healthy".to_string(),
        active_conversations,
    })
}
