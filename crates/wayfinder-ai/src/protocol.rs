//! Think/act directive protocol.
//!
//! Each engine step must either pick a tool with an input string or give a
//! final answer. Native tool calls are preferred; otherwise the reply text is
//! scanned for `Action:` / `Action Input:` or `Final Answer:` markers.

use crate::tools::TOOL_INPUT_FIELD;
use crate::{AiResponse, ToolDefinition};

const ACTION: &str = "Action:";
const ACTION_INPUT: &str = "Action Input:";
const FINAL_ANSWER: &str = "Final Answer:";

/// What the engine decided to do on one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Invoke `tool` with `input`.
    Act { tool: String, input: String },
    /// Reply to the user and end the turn.
    Finish(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("could not parse engine output: `{0}`")]
    Unparseable(String),
    #[error("engine output has both a final answer and an action: `{0}`")]
    Ambiguous(String),
    #[error("tool call `{0}` has no usable input")]
    MissingInput(String),
}

/// Render the system prompt listing the selectable tools and the reply format.
pub fn render_system_prompt(tools: &[ToolDefinition]) -> String {
    let listing = tools
        .iter()
        .map(|t| format!("{}: {}", t.name, t.description))
        .collect::<Vec<_>>()
        .join("\n");
    let names = tools
        .iter()
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are a travel assistant that answers questions about the weather and \
         places to visit. Never guess weather or attractions; use a tool.\n\n\
         You have access to the following tools:\n\n{listing}\n\n\
         To use a tool, reply with exactly:\n\
         Thought: <your reasoning>\n\
         {ACTION} <one of [{names}]>\n\
         {ACTION_INPUT} <the name of the city or place>\n\n\
         You will then receive an Observation with the tool result.\n\
         When you can answer the user, reply with:\n\
         Thought: <your reasoning>\n\
         {FINAL_ANSWER} <your reply to the user>"
    )
}

/// Observation text fed back to the engine after a tool ran.
pub fn observation(tool: &str, result: &str) -> String {
    format!("Observation ({tool}): {result}")
}

/// Observation text fed back after output that could not be used.
pub fn correction(err: &ProtocolError, tool_names: &[&str]) -> String {
    format!(
        "Observation: {err}. Reply with `{ACTION}` and `{ACTION_INPUT}` lines naming one of \
         [{}], or with a `{FINAL_ANSWER}` line.",
        tool_names.join(", ")
    )
}

/// Observation text fed back when the engine names a tool that does not exist.
pub fn unknown_tool(tool: &str, tool_names: &[&str]) -> String {
    format!(
        "Observation: {tool} is not a valid tool, try one of [{}].",
        tool_names.join(", ")
    )
}

/// Interpret one engine response as a directive.
pub fn parse_directive(response: &AiResponse) -> Result<Directive, ProtocolError> {
    if let Some(call) = response.tool_calls.first() {
        let input = match &call.arguments {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(map) => map
                .get(TOOL_INPUT_FIELD)
                .and_then(|v| v.as_str())
                .map(String::from),
            _ => None,
        };
        return match input {
            Some(input) if !input.trim().is_empty() => Ok(Directive::Act {
                tool: call.name.clone(),
                input: clean_input(&input),
            }),
            _ => Err(ProtocolError::MissingInput(call.name.clone())),
        };
    }

    parse_text(&response.content)
}

fn parse_text(text: &str) -> Result<Directive, ProtocolError> {
    let marker = text.find(FINAL_ANSWER);
    let final_answer = marker.map(|idx| text[idx + FINAL_ANSWER.len()..].trim().to_string());

    // action lines only count before the final answer; after it they are answer text
    let head = marker.map_or(text, |idx| &text[..idx]);
    let mut tool = None;
    let mut input = None;
    for line in head.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix(ACTION_INPUT) {
            input = Some(clean_input(rest));
        } else if let Some(rest) = line.strip_prefix(ACTION) {
            tool = Some(rest.trim().to_string());
        }
    }

    match (final_answer, tool, input) {
        (Some(_), Some(_), _) => Err(ProtocolError::Ambiguous(snippet(text))),
        (Some(answer), None, _) if !answer.is_empty() => Ok(Directive::Finish(answer)),
        (None, Some(tool), Some(input)) if !tool.is_empty() && !input.is_empty() => {
            Ok(Directive::Act { tool, input })
        }
        (None, Some(tool), _) if !tool.is_empty() => Err(ProtocolError::MissingInput(tool)),
        _ => Err(ProtocolError::Unparseable(snippet(text))),
    }
}

fn clean_input(raw: &str) -> String {
    raw.trim().trim_matches(|c| c == '"' || c == '\'').trim().to_string()
}

fn snippet(text: &str) -> String {
    text.chars().take(120).collect()
}
