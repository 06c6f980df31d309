//! OpenAI-compatible chat-completions client.
//!
//! Implements the `AiClient` trait against any endpoint speaking the
//! `/chat/completions` protocol (OpenAI, GitHub Models, Azure inference).

mod api;
mod client;
mod config;

pub use client::OpenAiClient;
pub use config::OpenAiConfig;
