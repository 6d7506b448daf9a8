use std::sync::Arc;

use tracing::{debug, info, warn};

use super::descriptor::WorkerDescriptor;
use super::errors::WorkerError;
use crate::application::text::summarise;
use crate::application::tooling::ToolBox;
use crate::infrastructure::model::{ModelProvider, ModelRequest};
use crate::types::{ChatMessage, MessageRole};

/// A specialist agent. Stateless apart from its descriptor, so one instance
/// serves every conversation concurrently.
pub struct Worker<P: ModelProvider> {
    descriptor: Arc<WorkerDescriptor>,
    provider: Arc<P>,
    toolbox: Arc<ToolBox>,
    max_tool_iterations: usize,
}

impl<P: ModelProvider> Clone for Worker<P> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor.clone(),
            provider: self.provider.clone(),
            toolbox: self.toolbox.clone(),
            max_tool_iterations: self.max_tool_iterations,
        }
    }
}

impl<P: ModelProvider> Worker<P> {
    pub fn new(
        descriptor: WorkerDescriptor,
        provider: Arc<P>,
        toolbox: Arc<ToolBox>,
        max_tool_iterations: usize,
    ) -> Self {
        Self {
            descriptor: Arc::new(descriptor),
            provider,
            toolbox,
            max_tool_iterations: max_tool_iterations.max(1),
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &WorkerDescriptor {
        &self.descriptor
    }

    /// Process a message and always produce text; failures are rendered as
    /// `Error processing request in <NAME>: <message>`.
    pub async fn process(&self, message: &str, context: Option<&str>) -> String {
        match self.try_process(message, context).await {
            Ok(text) => text,
            Err(err) => self.error_text(&err),
        }
    }

    pub fn error_text(&self, err: &WorkerError) -> String {
        format!(
            "Error processing request in {}: {}",
            self.descriptor.name,
            err.user_message()
        )
    }

    /// Run the tool loop until the model returns a final answer.
    pub async fn try_process(
        &self,
        message: &str,
        context: Option<&str>,
    ) -> Result<String, WorkerError> {
        let descriptor = &self.descriptor;
        info!(
            worker = descriptor.name.as_str(),
            model = descriptor.model.as_str(),
            message = %summarise(message),
            "Worker processing request"
        );

        let mut messages = vec![
            ChatMessage::new(MessageRole::System, descriptor.persona.clone()),
            ChatMessage::new(MessageRole::User, Self::user_prompt(message, context)),
        ];
        let tools = descriptor.tool_definitions();

        for iteration in 0..self.max_tool_iterations {
            let request = ModelRequest {
                provider: descriptor.provider.clone(),
                model: descriptor.model.clone(),
                messages: messages.clone(),
                tools: tools.clone(),
                mcp_servers: descriptor.mcp_servers.clone(),
            };
            let response = self.provider.chat(request).await?;

            if !response.requests_tools() {
                debug!(
                    worker = descriptor.name.as_str(),
                    iteration,
                    response = %summarise(&response.message.content),
                    "Worker produced final answer"
                );
                return Ok(response.message.content);
            }

            let calls = response.message.tool_calls.clone();
            debug!(
                worker = descriptor.name.as_str(),
                iteration,
                calls = calls.len(),
                "Model requested tool execution"
            );
            messages.push(response.message);

            for call in &calls {
                let result = self.toolbox.dispatch(call, &descriptor.tools).await;
                messages.push(ChatMessage::tool_result(call.id.clone(), result.to_string()));
            }
        }

        warn!(
            worker = descriptor.name.as_str(),
            limit = self.max_tool_iterations,
            "Worker exceeded tool iteration limit"
        );
        Err(WorkerError::ToolLoopExceeded {
            limit: self.max_tool_iterations,
        })
    }

    fn user_prompt(message: &str, context: Option<&str>) -> String {
        let context_section = context
            .map(str::trim)
            .filter(|ctx| !ctx.is_empty())
            .map(|ctx| format!("Previous conversation context:\n{ctx}\n\n"))
            .unwrap_or_default();
        format!(
            "{context_section}Current user request: {message}\n\n\
             Use your available tools to provide a comprehensive response that considers \
             the conversation context if provided."
        )
    }
}
