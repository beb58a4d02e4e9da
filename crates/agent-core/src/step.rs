//! ReAct Step Parser
//!
//! Turns raw model text into an [`AgentStep`]. Exactly two shapes are
//! accepted:
//!
//! ```text
//! Action: <tool name>
//! Action Input: <argument>
//! ```
//!
//! ```text
//! Final Answer: <reply to the user>
//! ```
//!
//! Anything else is a [`StepParseError`], which the decision loop turns into a
//! corrective observation and a re-prompt.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Marker preceding the final reply
pub const FINAL_ANSWER_MARKER: &str = "Final Answer:";

static ACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Action\s*\d*\s*:[\s]*(.*?)[\s]*Action\s*\d*\s*Input\s*\d*\s*:[\s]*(.*)")
        .expect("action pattern is valid")
});

static ACTION_ONLY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Action\s*\d*\s*:[\s]*(.*?)").expect("action-only pattern is valid")
});

static ACTION_INPUT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)[\s]*Action\s*\d*\s*Input\s*\d*\s*:[\s]*(.*)")
        .expect("action-input pattern is valid")
});

/// The model asked for a tool
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentAction {
    /// Tool name as written by the model (not yet checked against the registry)
    pub tool: String,
    
    /// The single string argument
    pub input: String,
    
    /// Raw model output that produced this step
    pub log: String,
}

/// The model produced its reply
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentFinish {
    pub answer: String,
    pub log: String,
}

/// One decision made by the model
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentStep {
    Action(AgentAction),
    Finish(AgentFinish),
}

/// Model output matched neither accepted shape
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StepParseError {
    #[error("Parsing LLM output produced both a final answer and a parse-able action")]
    AmbiguousOutput,
    
    #[error("Invalid Format: Missing 'Action:' after 'Thought:'")]
    MissingAction,
    
    #[error("Invalid Format: Missing 'Action Input:' after 'Action:'")]
    MissingActionInput,
    
    #[error("Could not parse LLM output")]
    Unrecognized,
}

impl StepParseError {
    /// Text fed back to the model as the observation for the rejected step
    pub fn observation(&self) -> String {
        match self {
            Self::MissingAction | Self::MissingActionInput => self.to_string(),
            Self::AmbiguousOutput | Self::Unrecognized => "Invalid or incomplete response".into(),
        }
    }
}

/// Parse raw model text into an agent step
///
/// # Errors
///
/// Returns a [`StepParseError`] when the text is neither an action nor a
/// final answer, or is both at once.
pub fn parse_step(text: &str) -> Result<AgentStep, StepParseError> {
    let includes_answer = text.contains(FINAL_ANSWER_MARKER);
    
    if let Some(caps) = ACTION_RE.captures(text) {
        if includes_answer {
            return Err(StepParseError::AmbiguousOutput);
        }
        
        let tool = caps.get(1).map_or("", |m| m.as_str()).trim();
        let input = caps
            .get(2)
            .map_or("", |m| m.as_str())
            .trim()
            .trim_matches('"')
            .trim();
        
        return Ok(AgentStep::Action(AgentAction {
            tool: tool.to_string(),
            input: input.to_string(),
            log: text.to_string(),
        }));
    }
    
    if includes_answer {
        let answer = text
            .rsplit(FINAL_ANSWER_MARKER)
            .next()
            .unwrap_or_default()
            .trim();
        
        return Ok(AgentStep::Finish(AgentFinish {
            answer: answer.to_string(),
            log: text.to_string(),
        }));
    }
    
    if !ACTION_ONLY_RE.is_match(text) {
        Err(StepParseError::MissingAction)
    } else if !ACTION_INPUT_RE.is_match(text) {
        Err(StepParseError::MissingActionInput)
    } else {
        Err(StepParseError::Unrecognized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_action() {
        let text = "Thought: Do I need to use a tool? Yes\n\
                    Action: find_nearby_therapists_by_location\n\
                    Action Input: Boston";
        
        let AgentStep::Action(action) = parse_step(text).unwrap() else {
            panic!("expected action");
        };
        assert_eq!(action.tool, "find_nearby_therapists_by_location");
        assert_eq!(action.input, "Boston");
        assert_eq!(action.log, text);
    }

    #[test]
    fn test_action_input_quotes_are_stripped() {
        let text = "Action: emergency_call_tool\nAction Input: \"User expressing self-harm intent\"  ";
        
        let AgentStep::Action(action) = parse_step(text).unwrap() else {
            panic!("expected action");
        };
        assert_eq!(action.input, "User expressing self-harm intent");
    }

    #[test]
    fn test_numbered_action_markers() {
        let text = "Action 1: ask_mental_health_specialist\nAction 1 Input: I can't sleep";
        
        let AgentStep::Action(action) = parse_step(text).unwrap() else {
            panic!("expected action");
        };
        assert_eq!(action.tool, "ask_mental_health_specialist");
        assert_eq!(action.input, "I can't sleep");
    }

    #[test]
    fn test_parse_final_answer_uses_last_marker() {
        let text = "Thought: Do I need to use a tool? No\n\
                    Final Answer: ignore\nFinal Answer:  It sounds like a heavy week. \n";
        
        let step = parse_step(text).unwrap();
        assert_eq!(
            step,
            AgentStep::Finish(AgentFinish {
                answer: "It sounds like a heavy week.".into(),
                log: text.into(),
            })
        );
    }

    #[test]
    fn test_both_action_and_answer_is_rejected() {
        let text = "Action: emergency_call_tool\nAction Input: risk\nFinal Answer: done";
        assert_eq!(parse_step(text), Err(StepParseError::AmbiguousOutput));
    }

    #[test]
    fn test_missing_action() {
        let err = parse_step("I think you should rest.").unwrap_err();
        assert_eq!(err, StepParseError::MissingAction);
        assert_eq!(
            err.observation(),
            "Invalid Format: Missing 'Action:' after 'Thought:'"
        );
    }

    #[test]
    fn test_missing_action_input() {
        let err = parse_step("Thought: yes\nAction: emergency_call_tool").unwrap_err();
        assert_eq!(err, StepParseError::MissingActionInput);
    }

    #[test]
    fn test_unrecognized_observation_is_generic() {
        assert_eq!(
            StepParseError::Unrecognized.observation(),
            "Invalid or incomplete response"
        );
        assert_eq!(
            StepParseError::AmbiguousOutput.observation(),
            "Invalid or incomplete response"
        );
    }
}
