use thiserror::Error;

use super::command::ToolKind;
use super::envelope::Envelope;

/// Problems resolving a model tool request before anything is executed
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool requested: {0}")]
    UnknownTool(String),
    #[error("tool '{0}' is not available to this worker")]
    NotAvailable(ToolKind),
    #[error("invalid arguments for tool '{tool}': {reason}")]
    InvalidArguments { tool: ToolKind, reason: String },
}

impl ToolError {
    pub fn user_message(&self) -> String {
        match self {
            ToolError::UnknownTool(name) => format!("Tool \"{name}\" does not exist."),
            ToolError::NotAvailable(tool) => {
                format!("Tool \"{tool}\" is not available to you. Use one of your declared tools.")
            }
            ToolError::InvalidArguments { tool, reason } => {
                format!("Invalid arguments for tool \"{tool}\": {reason}")
            }
        }
    }

    pub fn to_envelope(&self) -> Envelope<()> {
        Envelope::failure(self.user_message())
    }
}
