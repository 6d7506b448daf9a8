//! Message adapters - convert between different API formats

use super::types::ToolDefinition;
use crate::types::{ChatMessage, MessageRole, ToolCall};
use serde_json::{Value, json};

/// Adapter for converting messages to different API formats
pub struct MessageAdapter;

impl MessageAdapter {
    /// Convert messages to OpenAI-style format, including tool calls and tool results.
    pub fn to_openai_format(messages: &[ChatMessage]) -> Vec<Value> {
        messages
            .iter()
            .map(|msg| match msg.role {
                MessageRole::Assistant if !msg.tool_calls.is_empty() => {
                    let calls: Vec<Value> = msg
                        .tool_calls
                        .iter()
                        .map(|call| {
                            json!({
                                "id": call.id,
                                "type": "function",
                                "function": {
                                    "name": call.name,
                                    "arguments": call.arguments.to_string(),
                                }
                            })
                        })
                        .collect();
                    let content = if msg.content.is_empty() {
                        Value::Null
                    } else {
                        Value::String(msg.content.clone())
                    };
                    json!({
                        "role": "assistant",
                        "content": content,
                        "tool_calls": calls,
                    })
                }
                MessageRole::Tool => json!({
                    "role": "tool",
                    "tool_call_id": msg.tool_call_id.clone().unwrap_or_default(),
                    "content": msg.content.clone(),
                }),
                _ => json!({
                    "role": msg.role.as_str(),
                    "content": msg.content.clone()
                }),
            })
            .collect()
    }

    /// Convert tool definitions to OpenAI function tools
    pub fn to_openai_tools(tools: &[ToolDefinition]) -> Vec<Value> {
        tools
            .iter()
            .map(|tool| {
                json!({
                    "type": "function",
                    "function": {
                        "name": tool.name,
                        "description": tool.description,
                        "parameters": tool.parameters,
                    }
                })
            })
            .collect()
    }

    /// Convert messages to Anthropic Messages format
    /// Returns: (system_text, messages)
    ///
    /// Consecutive tool results are merged into a single user turn because the
    /// API requires strictly alternating roles.
    pub fn to_anthropic_format(messages: &[ChatMessage]) -> (Option<String>, Vec<Value>) {
        let mut system_parts = Vec::new();
        let mut output: Vec<Value> = Vec::new();
        let mut pending_results: Vec<Value> = Vec::new();

        let flush = |pending: &mut Vec<Value>, output: &mut Vec<Value>| {
            if !pending.is_empty() {
                output.push(json!({
                    "role": "user",
                    "content": std::mem::take(pending),
                }));
            }
        };

        for message in messages {
            match message.role {
                MessageRole::System => system_parts.push(message.content.clone()),
                MessageRole::Tool => pending_results.push(json!({
                    "type": "tool_result",
                    "tool_use_id": message.tool_call_id.clone().unwrap_or_default(),
                    "content": message.content.clone(),
                })),
                MessageRole::User => {
                    flush(&mut pending_results, &mut output);
                    output.push(json!({
                        "role": "user",
                        "content": message.content.clone(),
                    }));
                }
                MessageRole::Assistant => {
                    flush(&mut pending_results, &mut output);
                    let mut blocks = Vec::new();
                    if !message.content.is_empty() {
                        blocks.push(json!({"type": "text", "text": message.content.clone()}));
                    }
                    for call in &message.tool_calls {
                        blocks.push(json!({
                            "type": "tool_use",
                            "id": call.id,
                            "name": call.name,
                            "input": call.arguments,
                        }));
                    }
                    output.push(json!({"role": "assistant", "content": blocks}));
                }
            }
        }
        flush(&mut pending_results, &mut output);

        let system = if system_parts.is_empty() {
            None
        } else {
            Some(system_parts.join("\n\n"))
        };
        (system, output)
    }

    /// Convert tool definitions to Anthropic tools
    pub fn to_anthropic_tools(tools: &[ToolDefinition]) -> Vec<Value> {
        tools
            .iter()
            .map(|tool| {
                json!({
                    "name": tool.name,
                    "description": tool.description,
                    "input_schema": tool.parameters,
                })
            })
            .collect()
    }

    /// Decode an OpenAI `arguments` string. Undecodable text is kept as a JSON
    /// string so the tool layer can report it back to the model.
    pub fn decode_arguments(raw: &str) -> Value {
        if raw.trim().is_empty() {
            return json!({});
        }
        serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
    }

    pub fn tool_call(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> ToolCall {
        ToolCall {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openai_format_carries_tool_calls_and_results() {
        let messages = vec![
            ChatMessage::new(MessageRole::User, "hi"),
            ChatMessage::assistant_with_tools(
                "",
                vec![MessageAdapter::tool_call(
                    "call_1",
                    "check_weather",
                    json!({"city": "Paris"}),
                )],
            ),
            ChatMessage::tool_result("call_1", r#"{"success":true}"#),
        ];

        let formatted = MessageAdapter::to_openai_format(&messages);
        assert_eq!(formatted[1]["content"], Value::Null);
        assert_eq!(formatted[1]["tool_calls"][0]["function"]["name"], "check_weather");
        assert_eq!(
            formatted[1]["tool_calls"][0]["function"]["arguments"],
            r#"{"city":"Paris"}"#
        );
        assert_eq!(formatted[2]["role"], "tool");
        assert_eq!(formatted[2]["tool_call_id"], "call_1");
    }

    #[test]
    fn anthropic_format_merges_consecutive_tool_results() {
        let messages = vec![
            ChatMessage::new(MessageRole::System, "persona"),
            ChatMessage::new(MessageRole::User, "compare"),
            ChatMessage::assistant_with_tools(
                "checking",
                vec![
                    MessageAdapter::tool_call("a", "search_flights", json!({})),
                    MessageAdapter::tool_call("b", "check_weather", json!({})),
                ],
            ),
            ChatMessage::tool_result("a", "{}"),
            ChatMessage::tool_result("b", "{}"),
        ];

        let (system, formatted) = MessageAdapter::to_anthropic_format(&messages);
        assert_eq!(system.as_deref(), Some("persona"));
        assert_eq!(formatted.len(), 3);
        assert_eq!(formatted[1]["content"][1]["type"], "tool_use");
        assert_eq!(formatted[2]["role"], "user");
        assert_eq!(formatted[2]["content"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn undecodable_arguments_are_preserved_as_text() {
        assert_eq!(MessageAdapter::decode_arguments(""), json!({}));
        assert_eq!(
            MessageAdapter::decode_arguments("{not json"),
            Value::String("{not json".into())
        );
    }
}
