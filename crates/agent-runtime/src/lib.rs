//! # agent-runtime
//!
//! Model providers for the SafeSpace agent.
//!
//! ## Providers
//!
//! - **Groq** (default): hosted OpenAI-compatible chat completions, drives the
//!   tool-selection loop
//! - **Ollama** (default): local inference, serves the specialist model
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::{GroqProvider, OllamaProvider};
//!
//! let decision = GroqProvider::from_env()?;
//! let specialist = OllamaProvider::from_env();
//! let agent = AgentBuilder::new()
//!     .provider(Arc::new(decision))
//!     .build()?;
//! ```

#[cfg(feature = "groq")]
pub mod groq;

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "groq")]
pub use groq::{GroqConfig, GroqProvider};

#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaProvider};

// Re-export core types for convenience
pub use agent_core::{
    Agent, AgentError, LlmProvider, Message, Result, Role, ScriptedProvider, Tool, ToolRegistry,
};
