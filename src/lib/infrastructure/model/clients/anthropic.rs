//! Anthropic Messages API client implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::base::{Auth, HttpClientBase};
use crate::config::ModelProviderConfig;
use crate::infrastructure::model::adapter::MessageAdapter;
use crate::infrastructure::model::factory::resolve_api_key;
use crate::infrastructure::model::traits::ModelClient;
use crate::infrastructure::model::types::{ModelError, ModelRequest, ModelResponse};
use crate::types::ChatMessage;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

#[derive(Clone)]
pub struct AnthropicClient {
    base: HttpClientBase,
    api_path: String,
}

impl AnthropicClient {
    pub fn from_config(config: &ModelProviderConfig) -> Self {
        let api_key = resolve_api_key(&config.id, config.api_key.as_deref());
        Self {
            base: HttpClientBase::new(config.id.clone(), config.endpoint.clone(), api_key),
            api_path: config
                .api_path
                .clone()
                .unwrap_or_else(|| "/v1/messages".to_string()),
        }
    }
}

#[async_trait]
impl ModelClient for AnthropicClient {
    fn id(&self) -> &str {
        &self.base.id
    }

    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let url = self.base.build_url(&self.api_path);
        let (system, messages) = MessageAdapter::to_anthropic_format(&request.messages);

        let payload = AnthropicRequest {
            model: request.model.clone(),
            max_tokens: MAX_TOKENS,
            system,
            messages,
            tools: MessageAdapter::to_anthropic_tools(&request.tools),
        };

        info!(
            provider = self.base.id.as_str(),
            model = request.model.as_str(),
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Sending request to Anthropic provider"
        );

        let response: AnthropicResponse = self
            .base
            .post_json(
                &url,
                Auth::Header {
                    name: "x-api-key",
                    extra: &[("anthropic-version", ANTHROPIC_VERSION)],
                },
                &payload,
            )
            .await?;
        debug!(stop_reason = ?response.stop_reason, "Received response from Anthropic provider");

        let mut text = String::new();
        let mut tool_calls = Vec::new();
        for block in response.content {
            match block {
                ContentBlock::Text { text: chunk } => text.push_str(&chunk),
                ContentBlock::ToolUse { id, name, input } => {
                    tool_calls.push(MessageAdapter::tool_call(id, name, input));
                }
                ContentBlock::Other => {}
            }
        }

        if tool_calls.is_empty() {
            Ok(ModelResponse::new(text))
        } else {
            Ok(ModelResponse {
                message: ChatMessage::assistant_with_tools(text, tool_calls),
            })
        }
    }
}

#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    #[serde(other)]
    Other,
}
