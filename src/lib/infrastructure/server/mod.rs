mod docs;
mod dto;
mod error;
mod router;
mod routes;
mod state;

pub use dto::{ClearRequest, ClearResponse, ErrorResponse, HealthResponse, QueryRequest, QueryResponse};
pub use error::ServerError;
pub use router::build_router;
pub use state::ServerState;

use crate::application::router::Orchestrator;
use crate::infrastructure::model::ModelProvider;
use std::net::SocketAddr;
use std::sync::Arc;

pub async fn serve<P>(
    orchestrator: Arc<Orchestrator<P>>,
    addr: SocketAddr,
    cors_origins: &[String],
) -> Result<(), ServerError>
where
    P: ModelProvider + 'static,
{
    router::serve(orchestrator, addr, cors_origins).await
}
