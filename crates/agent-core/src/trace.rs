//! Execution Trace
//!
//! The ordered record of what happened during one decision loop run. It is
//! rendered into the prompt scratchpad and afterwards only used to report the
//! last tool that actually ran.

use serde::{Deserialize, Serialize};

use crate::step::AgentAction;

/// What the model did in one step
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepRecord {
    /// A registered tool was invoked
    ToolInvocation(AgentAction),
    
    /// The output could not be used (bad format or unknown tool name)
    Rejected {
        log: String,
        reason: String,
    },
}

impl StepRecord {
    fn log(&self) -> &str {
        match self {
            Self::ToolInvocation(action) => &action.log,
            Self::Rejected { log, .. } => log,
        }
    }
}

/// A step together with the observation it produced
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TraceEntry {
    pub step: StepRecord,
    pub observation: String,
    /// Observation has to be shown to the user verbatim
    #[serde(default)]
    pub relay: bool,
}

/// Ordered steps for a single request
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecutionTrace {
    entries: Vec<TraceEntry>,
}

impl ExecutionTrace {
    pub fn new() -> Self {
        Self::default()
    }
    
    pub fn push(&mut self, step: StepRecord, observation: impl Into<String>) {
        self.entries.push(TraceEntry {
            step,
            observation: observation.into(),
            relay: false,
        });
    }
    
    /// Record a step whose observation must reach the user
    pub fn push_relayed(&mut self, step: StepRecord, observation: impl Into<String>) {
        self.entries.push(TraceEntry {
            step,
            observation: observation.into(),
            relay: true,
        });
    }
    
    /// Observations that must appear in the reply, oldest first
    pub fn relayed_observations(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| e.relay)
            .map(|e| e.observation.as_str())
    }
    
    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }
    
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    
    /// Number of steps that invoked a tool
    pub fn tool_invocations(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.step, StepRecord::ToolInvocation(_)))
            .count()
    }
    
    /// Name of the most recently invoked tool, skipping rejected steps
    pub fn last_tool(&self) -> Option<&str> {
        self.entries.iter().rev().find_map(|e| match &e.step {
            StepRecord::ToolInvocation(action) => Some(action.tool.as_str()),
            StepRecord::Rejected { .. } => None,
        })
    }
    
    /// Render the `{agent_scratchpad}` prompt slot
    pub fn scratchpad(&self) -> String {
        let mut pad = String::new();
        for entry in &self.entries {
            pad.push_str(entry.step.log());
            pad.push_str("\nObservation: ");
            pad.push_str(&entry.observation);
            pad.push_str("\nThought: ");
        }
        pad
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(tool: &str) -> StepRecord {
        StepRecord::ToolInvocation(AgentAction {
            tool: tool.into(),
            input: "x".into(),
            log: format!("Action: {tool}\nAction Input: x"),
        })
    }

    #[test]
    fn test_empty_trace() {
        let trace = ExecutionTrace::new();
        assert!(trace.is_empty());
        assert_eq!(trace.last_tool(), None);
        assert_eq!(trace.scratchpad(), "");
    }

    #[test]
    fn test_last_tool_skips_rejected_steps() {
        let mut trace = ExecutionTrace::new();
        trace.push(action("ask_mental_health_specialist"), "reply");
        trace.push(
            StepRecord::Rejected {
                log: "gibberish".into(),
                reason: "Could not parse LLM output".into(),
            },
            "Invalid or incomplete response",
        );
        
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.tool_invocations(), 1);
        assert_eq!(trace.last_tool(), Some("ask_mental_health_specialist"));
    }

    #[test]
    fn test_only_rejected_steps_have_no_tool() {
        let mut trace = ExecutionTrace::new();
        trace.push(
            StepRecord::Rejected {
                log: "Action: nope\nAction Input: y".into(),
                reason: "Tool not found: nope".into(),
            },
            "nope is not a valid tool",
        );
        assert_eq!(trace.last_tool(), None);
    }

    #[test]
    fn test_relayed_observations() {
        let mut trace = ExecutionTrace::new();
        trace.push(action("ask_mental_health_specialist"), "reply");
        trace.push_relayed(action("emergency_call_tool"), "Help is on the way.");
        
        let relayed: Vec<_> = trace.relayed_observations().collect();
        assert_eq!(relayed, ["Help is on the way."]);
        assert_eq!(trace.last_tool(), Some("emergency_call_tool"));
    }

    #[test]
    fn test_scratchpad_format() {
        let mut trace = ExecutionTrace::new();
        trace.push(action("find_nearby_therapists_by_location"), "Therapists near Boston");
        
        assert_eq!(
            trace.scratchpad(),
            "Action: find_nearby_therapists_by_location\nAction Input: x\n\
             Observation: Therapists near Boston\nThought: "
        );
    }
}
