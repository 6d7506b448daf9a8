use super::dto::{
    ClearRequest, ClearResponse, ErrorResponse, HealthResponse, QueryRequest, QueryResponse,
};
use super::routes;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Flub travel assistant",
        description = "Routes travel questions to weather, flight and social-trend workers"
    ),
    paths(
        routes::query::query_handler,
        routes::clear::clear_handler,
        routes::health::health_handler
    ),
    components(
        schemas(
            QueryRequest,
            QueryResponse,
            ClearRequest,
            ClearResponse,
            HealthResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "conversation", description = "Ask questions and manage conversation history"),
        (name = "health", description = "Service status")
    )
)]
pub(super) struct ApiDoc;
