//! Client struct, request building, and response parsing.

use crate::tools::to_openai_tool;
use crate::{AiError, AiResponse, Message, Role, TokenUsage, ToolCall, ToolDefinition};

use super::config::OpenAiConfig;

/// OpenAI-compatible chat-completions client.
pub struct OpenAiClient {
    pub(crate) config: OpenAiConfig,
    pub(crate) http: reqwest::Client,
}

impl OpenAiClient {
    /// Build a client. A blank token is rejected here rather than on the
    /// first request.
    pub fn new(config: OpenAiConfig) -> Result<Self, AiError> {
        if config.token.trim().is_empty() {
            return Err(AiError::ConfigError("API token is empty".into()));
        }
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| AiError::ApiError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    /// Build the JSON request body for `/chat/completions`.
    pub(crate) fn build_request_body(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> serde_json::Value {
        let msgs: Vec<_> = messages
            .iter()
            .map(|msg| {
                let role = match msg.role {
                    Role::System => "system",
                    Role::User | Role::Tool => "user", // observations go back as user text
                    Role::Assistant => "assistant",
                };
                serde_json::json!({
                    "role": role,
                    "content": msg.content,
                })
            })
            .collect();

        let mut body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "messages": msgs,
        });

        if !tools.is_empty() {
            let tool_defs: Vec<_> = tools.iter().map(to_openai_tool).collect();
            body["tools"] = serde_json::json!(tool_defs);
        }

        body
    }

    /// Parse a non-streaming response.
    pub(crate) fn parse_response(&self, json: serde_json::Value) -> Result<AiResponse, AiError> {
        let message = json["choices"]
            .get(0)
            .map(|choice| &choice["message"])
            .ok_or_else(|| AiError::ParseError("response has no choices".into()))?;

        let content = message["content"].as_str().unwrap_or_default().to_string();

        let tool_calls = message["tool_calls"]
            .as_array()
            .map(|calls| {
                calls
                    .iter()
                    .map(|c| {
                        // arguments arrive as a JSON-encoded string
                        let raw = c["function"]["arguments"].as_str().unwrap_or("{}");
                        ToolCall {
                            id: c["id"].as_str().unwrap_or("").to_string(),
                            name: c["function"]["name"].as_str().unwrap_or("").to_string(),
                            arguments: serde_json::from_str(raw)
                                .unwrap_or_else(|_| serde_json::Value::String(raw.to_string())),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        let usage = TokenUsage {
            input_tokens: json["usage"]["prompt_tokens"].as_u64().unwrap_or(0),
            output_tokens: json["usage"]["completion_tokens"].as_u64().unwrap_or(0),
        };

        Ok(AiResponse {
            content,
            tool_calls,
            usage,
        })
    }
}
