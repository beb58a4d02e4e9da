//! # agent-core
//!
//! Core agent logic: a text-protocol ReAct loop over a fixed tool set and a
//! provider-agnostic LLM abstraction.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Agent                                │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐   │
//! │  │  Reasoning  │  │    Tools    │  │   LlmProvider       │   │
//! │  │    Loop     │──│   Registry  │──│   (Strategy)        │   │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘   │
//! │         │                                                     │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐   │
//! │  │ Step Parser │  │    Trace    │──│  Response Extractor │   │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait lets the decision model and the tools' own model
//! backends be swapped without changing agent logic.

pub mod provider;
pub mod tool;
pub mod step;
pub mod trace;
pub mod reasoning;
pub mod response;
pub mod message;
pub mod error;
pub mod scripted;

pub use error::{AgentError, Result};
pub use message::{Message, Role};
pub use provider::{Completion, GenerationOptions, LlmProvider};
pub use reasoning::{Agent, AgentBuilder, AgentConfig, AgentRun, Terminal};
pub use response::{AgentReply, extract_reply};
pub use scripted::ScriptedProvider;
pub use step::{AgentStep, parse_step};
pub use tool::{ArgumentSchema, Tool, ToolDescriptor, ToolRegistry};
pub use trace::ExecutionTrace;
