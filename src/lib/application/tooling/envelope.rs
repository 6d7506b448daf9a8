use serde::Serialize;
use serde_json::{Value, json};

/// Uniform tool result: `{success: true, ...payload}` or `{success: false, error}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(flatten)]
    pub payload: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(payload: T) -> Self {
        Self {
            success: true,
            payload: Some(payload),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            payload: None,
            error: Some(message.into()),
        }
    }

    /// Serialize for the model; serialization failures become an error envelope.
    pub fn into_value(self) -> Value {
        serde_json::to_value(&self).unwrap_or_else(|err| {
            json!({
                "success": false,
                "error": format!("Failed to encode tool result: {err}"),
            })
        })
    }
}
