//! Conversation orchestration for Wayfinder.
//!
//! The [`Orchestrator`] owns one [`ConversationSession`], offers the
//! capabilities in a [`CapabilityRegistry`] to the reasoning engine, runs
//! the bounded think/act loop, and always answers with text.

pub mod orchestrator;
pub mod registry;
pub mod session;

pub use orchestrator::{Orchestrator, ReasoningError, DEFAULT_MAX_STEPS};
pub use registry::{CapabilityDescriptor, CapabilityRegistry, RegistryError};
pub use session::ConversationSession;
