//! Reasoning engine settings.

use serde::{Deserialize, Serialize};

/// Reasoning engine (chat-completions endpoint) configuration.
///
/// The credential itself is never stored here; `credential_env` only names
/// the environment variable the host reads it from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub model: String,
    pub base_url: String,
    /// Sampling temperature (valid range: 0.0-2.0).
    pub temperature: f64,
    pub max_tokens: u32,
    /// Think/act loop budget per turn (valid range: 1-50).
    pub max_steps: u32,
    pub credential_env: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".into(),
            base_url: "https://models.inference.ai.azure.com".into(),
            temperature: 0.0,
            max_tokens: 1024,
            max_steps: 15,
            credential_env: "GITHUB_TOKEN".into(),
        }
    }
}
