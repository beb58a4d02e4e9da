//! Response Extraction
//!
//! Collapses a finished run (or its failure) into the two strings the caller
//! sees. Internal error text never leaves this module.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::reasoning::{AgentRun, Terminal};
use crate::trace::ExecutionTrace;

/// `tool_called` when the model answered without a tool
pub const NO_TOOL_USED: &str = "None (Direct Response)";

/// `tool_called` for every failure
pub const ERROR_TOOL: &str = "Error";

/// Reply text for every failure
pub const FALLBACK_RESPONSE: &str =
    "I encountered a formatting issue. I am here to listen; please tell me more.";

/// Reply text when the model's final answer was empty
pub const EMPTY_ANSWER_RESPONSE: &str = "I'm sorry, I'm having trouble formulating a response.";

/// What the caller receives
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentReply {
    pub response: String,
    pub tool_called: String,
}

impl AgentReply {
    /// The fixed payload used for every failure
    pub fn fallback() -> Self {
        Self {
            response: FALLBACK_RESPONSE.into(),
            tool_called: ERROR_TOOL.into(),
        }
    }
    
    pub fn is_fallback(&self) -> bool {
        self.tool_called == ERROR_TOOL
    }
}

/// Extract the reply from a run
pub fn extract_reply(outcome: Result<AgentRun>) -> AgentReply {
    let run = match outcome {
        Ok(run) => run,
        Err(e) => {
            if e.is_provider_failure() {
                tracing::error!(error = %e, "Model backend failed");
            } else {
                tracing::error!(error = %e, "Agent run failed");
            }
            return AgentReply::fallback();
        }
    };
    
    match run.terminal {
        Terminal::Final(answer) => {
            let tool_called = run.trace.last_tool().unwrap_or(NO_TOOL_USED).to_string();
            let answer = if answer.trim().is_empty() {
                EMPTY_ANSWER_RESPONSE.to_string()
            } else {
                answer
            };
            let response = with_relayed(&run.trace, answer);
            AgentReply { response, tool_called }
        }
        Terminal::Aborted(reason) => {
            tracing::warn!(run_id = %run.run_id, %reason, "Returning fallback reply");
            AgentReply::fallback()
        }
    }
}

/// Prepend every relayed paragraph the answer does not already contain
fn with_relayed(trace: &ExecutionTrace, answer: String) -> String {
    let mut missing: Vec<&str> = Vec::new();
    for paragraph in trace
        .relayed_observations()
        .flat_map(|obs| obs.split("\n\n"))
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        if !answer.contains(paragraph) && !missing.contains(&paragraph) {
            missing.push(paragraph);
        }
    }
    
    if missing.is_empty() {
        return answer;
    }
    tracing::info!(paragraphs = missing.len(), "Relaying tool output the answer left out");
    missing.push(&answer);
    missing.join("\n\n")
}
