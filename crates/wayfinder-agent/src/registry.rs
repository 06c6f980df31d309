//! Capability registry: the action set offered to the reasoning engine.
//!
//! Capabilities are looked up by name; the engine only ever sees names and
//! descriptions, never the capabilities themselves.

use std::collections::HashMap;

use wayfinder_ai::tools::text_tool;
use wayfinder_ai::ToolDefinition;
use wayfinder_travel::Capability;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("capability `{0}` is already registered")]
    Duplicate(String),
    #[error("no capability named `{0}`")]
    NotFound(String),
}

/// A registered capability with its selection metadata.
pub struct CapabilityDescriptor {
    name: String,
    description: String,
    capability: Capability,
}

impl CapabilityDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        capability: impl Into<Capability>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            capability: capability.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Run the capability; failures come back as text.
    pub async fn invoke(&self, query: &str) -> String {
        self.capability.invoke(query).await
    }

    pub fn tool_definition(&self) -> ToolDefinition {
        text_tool(&self.name, &self.description)
    }
}

impl From<Capability> for CapabilityDescriptor {
    /// Describe a capability with its stock name and description.
    fn from(capability: Capability) -> Self {
        let kind = capability.kind();
        Self::new(kind.default_name(), kind.default_description(), capability)
    }
}

/// Name → descriptor mapping that remembers registration order.
#[derive(Default)]
pub struct CapabilityRegistry {
    descriptors: Vec<CapabilityDescriptor>,
    by_name: HashMap<String, usize>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor. Names must be unique.
    pub fn register(&mut self, descriptor: CapabilityDescriptor) -> Result<(), RegistryError> {
        if self.by_name.contains_key(descriptor.name()) {
            return Err(RegistryError::Duplicate(descriptor.name().to_string()));
        }
        self.by_name
            .insert(descriptor.name().to_string(), self.descriptors.len());
        self.descriptors.push(descriptor);
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Result<&CapabilityDescriptor, RegistryError> {
        self.by_name
            .get(name)
            .map(|&idx| &self.descriptors[idx])
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// All descriptors in registration order.
    pub fn all(&self) -> &[CapabilityDescriptor] {
        &self.descriptors
    }

    pub fn names(&self) -> Vec<&str> {
        self.all().iter().map(|d| d.name()).collect()
    }

    /// Tool definitions for the engine, in registration order.
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.all()
            .iter()
            .map(CapabilityDescriptor::tool_definition)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
