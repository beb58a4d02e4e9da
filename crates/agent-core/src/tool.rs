//! Tool System
//!
//! Every tool the model may pick takes a single string argument and returns a
//! string observation. The registry is built once at startup and shared
//! read-only by all requests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;

/// The single string argument a tool accepts
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArgumentSchema {
    /// Argument name (e.g., "query", "location")
    pub name: String,
    
    /// Human-readable description
    pub description: String,
}

/// Tool descriptor (rendered into the decision prompt)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolDescriptor {
    /// Unique tool identifier
    pub name: String,
    
    /// Usage instructions shown to the LLM
    pub description: String,
    
    /// The tool's only argument
    pub argument: ArgumentSchema,
    
    /// Whether calling the tool affects the outside world
    #[serde(default)]
    pub has_side_effects: bool,
    
    /// The observation must reach the user even if the final answer leaves it out
    #[serde(default)]
    pub relay_observation: bool,
}

impl ToolDescriptor {
    /// Render as `name(arg: str) - description`
    pub fn render(&self) -> String {
        format!(
            "{}({}: str) - {}",
            self.name, self.argument.name, self.description
        )
    }
}

/// Tool trait - implement to add new capabilities
#[async_trait]
pub trait Tool: Send + Sync {
    /// Static description of the tool
    fn descriptor(&self) -> ToolDescriptor;
    
    /// Run the tool. Errors abort the request that invoked it.
    async fn call(&self, input: &str) -> Result<String>;
}

/// Registry for available tools, in registration order
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<(ToolDescriptor, Arc<dyn Tool>)>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Register a new tool. A tool with the same name replaces the old one.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.register_shared(Arc::new(tool));
    }
    
    /// Register an already shared tool
    pub fn register_shared(&mut self, tool: Arc<dyn Tool>) {
        let descriptor = tool.descriptor();
        if let Some(slot) = self.tools.iter_mut().find(|(d, _)| d.name == descriptor.name) {
            tracing::warn!(tool = %descriptor.name, "Replacing already registered tool");
            *slot = (descriptor, tool);
        } else {
            self.tools.push((descriptor, tool));
        }
    }
    
    /// Get a tool by exact name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools
            .iter()
            .find(|(d, _)| d.name == name)
            .map(|(_, t)| Arc::clone(t))
    }
    
    /// All tool descriptors
    pub fn descriptors(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.iter().map(|(d, _)| d)
    }
    
    /// Tool names
    pub fn names(&self) -> Vec<&str> {
        self.descriptors().map(|d| d.name.as_str()).collect()
    }
    
    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }
    
    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
    
    /// One line per tool, for the `{tools}` prompt slot
    pub fn render_descriptions(&self) -> String {
        self.descriptors()
            .map(ToolDescriptor::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
    
    /// Comma separated names, for the `{tool_names}` prompt slot
    pub fn render_names(&self) -> String {
        self.names().join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo(&'static str);

    #[async_trait]
    impl Tool for Echo {
        fn descriptor(&self) -> ToolDescriptor {
            ToolDescriptor {
                name: self.0.into(),
                description: "Repeat the input".into(),
                argument: ArgumentSchema {
                    name: "text".into(),
                    description: "Text to repeat".into(),
                },
                has_side_effects: false,
                relay_observation: false,
            }
        }
        
        async fn call(&self, input: &str) -> Result<String> {
            Ok(format!("{}: {}", self.0, input))
        }
    }

    #[test]
    fn test_tool_registry() {
        let mut registry = ToolRegistry::new();
        registry.register(Echo("first"));
        registry.register(Echo("second"));
        
        assert_eq!(registry.len(), 2);
        assert!(registry.get("first").is_some());
        assert!(registry.get("unknown").is_none());
        assert!(registry.get("First").is_none());
        assert_eq!(registry.names(), vec!["first", "second"]);
    }

    #[test]
    fn test_duplicate_registration_replaces() {
        let mut registry = ToolRegistry::new();
        registry.register(Echo("same"));
        registry.register(Echo("same"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_prompt_rendering() {
        let mut registry = ToolRegistry::new();
        registry.register(Echo("echo"));
        registry.register(Echo("parrot"));
        
        assert_eq!(
            registry.render_descriptions(),
            "echo(text: str) - Repeat the input\nparrot(text: str) - Repeat the input"
        );
        assert_eq!(registry.render_names(), "echo, parrot");
    }

    #[tokio::test]
    async fn test_call_through_registry() {
        let mut registry = ToolRegistry::new();
        registry.register(Echo("echo"));
        
        let tool = registry.get("echo").unwrap();
        assert_eq!(tool.call("hi").await.unwrap(), "echo: hi");
    }
}
