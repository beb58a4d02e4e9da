//! Mental Health Specialist Tool
//!
//! Forwards the user's concern to a medically tuned model and returns its
//! reply verbatim.

use std::sync::Arc;
use async_trait::async_trait;

use agent_core::{
    ArgumentSchema, GenerationOptions, LlmProvider, Message, Tool, ToolDescriptor,
    Result as CoreResult,
};

use crate::ToolKind;

/// Specialist model served by Ollama
pub const DEFAULT_SPECIALIST_MODEL: &str = "alibayram/medgemma:4b";

const SPECIALIST_SYSTEM_PROMPT: &str = "You are Dr. Emily Hartman, a warm and experienced \
clinical psychologist. Respond to the person the way you would in a real session: \
acknowledge their feelings first, then gently explore what is going on and offer one or two \
practical, evidence-based ideas. Speak conversationally in a few short paragraphs. Do not use \
bullet points, do not diagnose, and do not mention that you are an AI.";

/// Tool for empathetic, therapeutic replies
pub struct SpecialistTool {
    provider: Arc<dyn LlmProvider>,
    options: GenerationOptions,
}

impl SpecialistTool {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            options: GenerationOptions::for_model(model).with_temperature(0.7),
        }
    }
}

#[async_trait]
impl Tool for SpecialistTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: ToolKind::MentalHealthSpecialist.name().into(),
            description: "Generate a therapeutic response using the MedGemma model. Use this for \
                all general user queries, mental health questions, emotional concerns, or to offer \
                empathetic, evidence-based guidance in a conversational tone."
                .into(),
            argument: ArgumentSchema {
                name: "query".into(),
                description: "The user's message or concern".into(),
            },
            has_side_effects: false,
            relay_observation: false,
        }
    }
    
    async fn call(&self, query: &str) -> CoreResult<String> {
        let messages = [
            Message::system(SPECIALIST_SYSTEM_PROMPT),
            Message::user(query),
        ];
        
        let completion = self.provider.complete(&messages, &self.options).await?;
        tracing::debug!(
            backend = self.provider.name(),
            model = %completion.model,
            "Specialist replied"
        );
        
        Ok(completion.content)
    }
}
