//! Scripted Provider
//!
//! A deterministic `LlmProvider` that replays canned completions. Used for
//! offline runs and throughout the workspace's tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{AgentError, Result};
use crate::message::Message;
use crate::provider::{Completion, GenerationOptions, LlmProvider};

enum Exhausted {
    Fail(String),
    Repeat(String),
}

/// Replays a fixed list of completions, one per call
pub struct ScriptedProvider {
    script: Mutex<VecDeque<String>>,
    exhausted: Exhausted,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl ScriptedProvider {
    /// Reply with each item in turn, then fail
    pub fn replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Mutex::new(replies.into_iter().map(Into::into).collect()),
            exhausted: Exhausted::Fail("script exhausted".into()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }
    
    /// Reply with the same text forever
    pub fn repeating(reply: impl Into<String>) -> Self {
        Self {
            exhausted: Exhausted::Repeat(reply.into()),
            ..Self::replies(Vec::<String>::new())
        }
    }
    
    /// Every call fails as if the backend were down
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            exhausted: Exhausted::Fail(reason.into()),
            ..Self::replies(Vec::<String>::new())
        }
    }
    
    /// Number of `complete` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
    
    /// Content of the last message of the most recent call
    pub async fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().await.clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "Scripted"
    }
    
    async fn health_check(&self) -> Result<bool> {
        Ok(!matches!(self.exhausted, Exhausted::Fail(_)) || !self.script.lock().await.is_empty())
    }
    
    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().await = messages.last().map(|m| m.content.clone());
        
        let next = self.script.lock().await.pop_front();
        match (next, &self.exhausted) {
            (Some(reply), _) => Ok(Completion::text(reply, &options.model)),
            (None, Exhausted::Repeat(reply)) => Ok(Completion::text(reply.clone(), &options.model)),
            (None, Exhausted::Fail(reason)) => Err(AgentError::ProviderUnavailable(reason.clone())),
        }
    }
}
