//! # safespace-tools
//!
//! The tool set behind the SafeSpace mental-health assistant.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  ask_mental_health_specialist   → specialist model (Ollama)      │
//! │  emergency_call_tool            → EmergencyDialer (Twilio)       │
//! │  find_nearby_therapists_by_location → directory (placeholder)    │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tool choice is left to the decision model; nothing here second-guesses it.

pub mod svckit;
pub mod dialer;
pub mod error;

use std::sync::Arc;

use agent_core::{LlmProvider, ToolRegistry};

pub use dialer::{CallReceipt, EmergencyDialer, TwilioConfig, TwilioDialer, UnconfiguredDialer};
pub use error::{DialerError, Result};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{
        EmergencyCallTool,
        SpecialistTool,
        TherapistLookupTool,
    };
}

/// The closed set of tools the decision model may name
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ToolKind {
    MentalHealthSpecialist,
    EmergencyCall,
    TherapistLookup,
}

impl ToolKind {
    /// Registration (and prompt) order
    pub const ALL: [Self; 3] = [
        Self::MentalHealthSpecialist,
        Self::EmergencyCall,
        Self::TherapistLookup,
    ];
    
    /// Name the model must write after `Action:`
    pub const fn name(self) -> &'static str {
        match self {
            Self::MentalHealthSpecialist => "ask_mental_health_specialist",
            Self::EmergencyCall => "emergency_call_tool",
            Self::TherapistLookup => "find_nearby_therapists_by_location",
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Build the registry holding exactly one tool per `ToolKind`
pub fn safespace_registry(
    specialist: Arc<dyn LlmProvider>,
    specialist_model: &str,
    dialer: Arc<dyn EmergencyDialer>,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    
    for kind in ToolKind::ALL {
        match kind {
            ToolKind::MentalHealthSpecialist => {
                registry.register(tools::SpecialistTool::new(
                    Arc::clone(&specialist),
                    specialist_model,
                ));
            }
            ToolKind::EmergencyCall => {
                registry.register(tools::EmergencyCallTool::new(Arc::clone(&dialer)));
            }
            ToolKind::TherapistLookup => registry.register(tools::TherapistLookupTool),
        }
    }
    
    registry
}

/// ReAct prompt for the SafeSpace decision model
pub const SAFESPACE_PROMPT: &str = r"You are a compassionate AI Mental Health Assistant. Your goal is to support the user.
You have access to the following tools:

{tools}

If the user expresses suicidal thoughts or any intent to harm themselves, you MUST use emergency_call_tool before anything else.

To use a tool, you MUST use the following format:

Thought: Do I need to use a tool? Yes
Action: the action to take, should be one of [{tool_names}]
Action Input: the input to the action
Observation: the result of the action

When you have a final response for the user, or if you do not need to use a tool, you MUST use this format:

Thought: Do I need to use a tool? No
Final Answer: [your warm, empathetic response here]

Begin!

Question: {input}
Thought: {agent_scratchpad}";
