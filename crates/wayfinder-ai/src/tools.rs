//! Tool definitions exposed to the reasoning engine.
//!
//! Every capability takes a single free-text input, so all tools share the
//! same one-field parameter schema.

use crate::ToolDefinition;

/// Name of the single string argument every tool accepts.
pub const TOOL_INPUT_FIELD: &str = "input";

/// Build a tool definition with a single required string `input` argument.
pub fn text_tool(name: impl Into<String>, description: impl Into<String>) -> ToolDefinition {
    ToolDefinition {
        name: name.into(),
        description: description.into(),
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                TOOL_INPUT_FIELD: {
                    "type": "string",
                    "description": "Name of the city or place the question is about"
                }
            },
            "required": [TOOL_INPUT_FIELD]
        }),
    }
}

/// Convert a tool definition to the OpenAI chat-completions format.
pub fn to_openai_tool(tool: &ToolDefinition) -> serde_json::Value {
    serde_json::json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": tool.parameters,
        }
    })
}
