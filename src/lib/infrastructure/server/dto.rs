use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /query`. Both fields are required; they are optional here
/// so that absence can be reported with the standard error envelope.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct QueryRequest {
    /// Conversation identifier, e.g. a phone number
    #[schema(example = "+15550100")]
    pub sender: Option<String>,
    #[schema(example = "What is the best flight from EWR to LAX on 2025-12-01?")]
    pub query: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QueryResponse {
    pub success: bool,
    pub response: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct ClearRequest {
    pub sender: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClearResponse {
    pub success: bool,
    /// `History cleared` or `No history found`
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub active_conversations: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
