//! Conversation transcript kept in the browser

use serde::{Deserialize, Serialize};

/// Who produced a turn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One rendered chat turn
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub id: usize,
    pub role: Speaker,
    pub content: String,
}

/// Append-only list of turns
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }
    
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Speaker::User, content.into());
    }
    
    /// Append the assistant's reply with a note naming the tool it used
    pub fn push_assistant(&mut self, response: &str, tool_called: &str) {
        self.push(Speaker::Assistant, assistant_content(response, tool_called));
    }
    
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }
    
    pub fn len(&self) -> usize {
        self.turns.len()
    }
    
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
    
    fn push(&mut self, role: Speaker, content: String) {
        let id = self.turns.len();
        self.turns.push(ChatTurn { id, role, content });
    }
}

/// Text shown for an assistant turn
pub fn assistant_content(response: &str, tool_called: &str) -> String {
    format!("{response}\n\n*System Note: Used tool [{tool_called}]*")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turns_keep_order() {
        let mut transcript = Transcript::new();
        transcript.push_user("hello");
        transcript.push_assistant("Hi! I'm here for you.", "None (Direct Response)");
        transcript.push_user("I feel anxious");

        let roles: Vec<_> = transcript.turns().iter().map(|t| t.role).collect();
        assert_eq!(roles, [Speaker::User, Speaker::Assistant, Speaker::User]);
        assert_eq!(transcript.turns()[2].id, 2);
        assert_eq!(transcript.len(), 3);
    }

    #[test]
    fn test_assistant_note() {
        let mut transcript = Transcript::new();
        transcript.push_assistant("Therapists near Boston: ...", "find_nearby_therapists_by_location");

        assert_eq!(
            transcript.turns()[0].content,
            "Therapists near Boston: ...\n\n*System Note: Used tool [find_nearby_therapists_by_location]*"
        );
    }

    #[test]
    fn test_empty() {
        let transcript = Transcript::new();
        assert!(transcript.is_empty());
        assert_eq!(Speaker::Assistant.as_str(), "assistant");
    }
}
