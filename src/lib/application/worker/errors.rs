use thiserror::Error;

use crate::infrastructure::model::ModelError;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("tool loop exceeded {limit} iterations without a final answer")]
    ToolLoopExceeded { limit: usize },
    #[error("worker did not respond within {seconds} seconds")]
    Timeout { seconds: u64 },
}

impl WorkerError {
    pub fn user_message(&self) -> String {
        match self {
            WorkerError::Model(err) => err.user_message(),
            WorkerError::ToolLoopExceeded { limit } => format!(
                "The request needed more than {limit} tool calls and was stopped before finishing."
            ),
            WorkerError::Timeout { seconds } => {
                format!("The worker did not respond within {seconds} seconds.")
            }
        }
    }
}
