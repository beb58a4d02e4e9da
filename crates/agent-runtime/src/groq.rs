//! Groq LLM Provider
//!
//! Implementation of `LlmProvider` for Groq's OpenAI-compatible chat
//! completions API. Drives the tool-selection loop.

use std::time::Duration;

use agent_core::{
    error::{AgentError, Result},
    message::Message,
    provider::{Completion, FinishReason, GenerationOptions, LlmProvider, TokenUsage},
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// Groq provider configuration
#[derive(Clone, Debug)]
pub struct GroqConfig {
    /// API key (`GROQ_API_KEY`)
    pub api_key: String,
    
    /// API base URL, without trailing slash
    pub base_url: String,
    
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GroqConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.groq.com/openai/v1";
    
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.into(),
            timeout_secs: 60,
        }
    }
    
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
    
    /// Read `GROQ_API_KEY` and optional `GROQ_BASE_URL`
    ///
    /// # Errors
    ///
    /// Fails when `GROQ_API_KEY` is unset or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
    
    /// Blank values count as unset
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        
        let api_key = read("GROQ_API_KEY")
            .ok_or_else(|| AgentError::Config("GROQ_API_KEY is not set".into()))?;
        
        let config = Self::new(api_key);
        Ok(match read("GROQ_BASE_URL") {
            Some(url) => config.with_base_url(url.trim()),
            None => config,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    #[serde(skip_serializing_if = "no_stop")]
    stop: &'a [String],
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn no_stop(stop: &&[String]) -> bool {
    stop.is_empty()
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

/// Groq LLM provider
pub struct GroqProvider {
    client: Client,
    config: GroqConfig,
}

impl GroqProvider {
    /// Create from configuration
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn from_config(config: GroqConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Config(format!("HTTP client: {e}")))?;
        
        Ok(Self { client, config })
    }
    
    /// Create from environment variables
    ///
    /// # Errors
    ///
    /// Fails when `GROQ_API_KEY` is missing.
    pub fn from_env() -> Result<Self> {
        Self::from_config(GroqConfig::from_env()?)
    }
    
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }
    
    /// Turn a non-success response into an `AgentError`
    async fn error_for(response: reqwest::Response) -> AgentError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.error.message)
            .unwrap_or(body);
        
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                AgentError::Config(format!("Groq rejected the API key: {message}"))
            }
            s if s == StatusCode::TOO_MANY_REQUESTS || s.is_server_error() => {
                AgentError::ProviderUnavailable(format!("Groq {s}: {message}"))
            }
            s => AgentError::Provider(format!("Groq {s}: {message}")),
        }
    }
}

#[async_trait]
impl LlmProvider for GroqProvider {
    fn name(&self) -> &'static str {
        "Groq"
    }
    
    async fn health_check(&self) -> Result<bool> {
        let response = self.client
            .get(self.url("/models"))
            .bearer_auth(&self.config.api_key)
            .send()
            .await;
        
        match response {
            Ok(r) if r.status().is_success() => Ok(true),
            Ok(r) => {
                tracing::warn!(status = %r.status(), "Groq health check failed");
                Ok(false)
            }
            Err(e) => {
                tracing::warn!("Groq health check failed: {}", e);
                Ok(false)
            }
        }
    }
    
    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let request = ChatRequest {
            model: &options.model,
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
            stop: &options.stop_sequences,
        };
        
        let response = self.client
            .post(self.url("/chat/completions"))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::ProviderUnavailable(format!("Groq: {e}")))?;
        
        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }
        
        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Provider(format!("Groq returned an unreadable body: {e}")))?;
        
        let choice = body.choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Provider("Groq returned no choices".into()))?;
        
        Ok(Completion {
            content: choice.message.content.unwrap_or_default(),
            model: body.model.unwrap_or_else(|| options.model.clone()),
            usage: body.usage,
            finish_reason: choice.finish_reason.as_deref().map(FinishReason::from_api),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> GroqProvider {
        GroqProvider::from_config(GroqConfig::new("test-key").with_base_url(server.uri())).unwrap()
    }

    fn options() -> GenerationOptions {
        GenerationOptions::for_model("llama-3.1-8b-instant")
            .with_temperature(0.1)
            .with_stop("\nObservation")
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = GroqConfig::new("k").with_base_url("http://localhost:9999/");
        assert_eq!(config.base_url, "http://localhost:9999");
        assert_eq!(GroqConfig::new("k").base_url, GroqConfig::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_blank_env_values_are_unset() {
        let config = GroqConfig::from_lookup(|key| match key {
            "GROQ_API_KEY" => Some("k".into()),
            "GROQ_BASE_URL" => Some("  ".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.base_url, GroqConfig::DEFAULT_BASE_URL);
        
        let missing_key = GroqConfig::from_lookup(|key| (key == "GROQ_API_KEY").then(String::new));
        assert!(matches!(missing_key, Err(AgentError::Config(_))));
    }

    #[tokio::test]
    async fn test_complete() {
        let server = MockServer::start().await;
        
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": "llama-3.1-8b-instant",
                "stop": ["\nObservation"],
                "messages": [{"role": "user", "content": "Question: hi"}],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "llama-3.1-8b-instant",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "Final Answer: Hello."},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 12, "completion_tokens": 4, "total_tokens": 16}
            })))
            .expect(1)
            .mount(&server)
            .await;
        
        let completion = provider(&server)
            .complete(&[Message::user("Question: hi")], &options())
            .await
            .unwrap();
        
        assert_eq!(completion.content, "Final Answer: Hello.");
        assert_eq!(completion.finish_reason, Some(FinishReason::Stop));
        assert_eq!(completion.usage.unwrap().total_tokens, 16);
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let server = MockServer::start().await;
        
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({
                "error": {"message": "over capacity"}
            })))
            .mount(&server)
            .await;
        
        let err = provider(&server)
            .complete(&[Message::user("hi")], &options())
            .await
            .unwrap_err();
        
        assert!(err.is_provider_failure());
        assert!(err.to_string().contains("over capacity"));
    }

    #[tokio::test]
    async fn test_bad_key_is_config_error() {
        let server = MockServer::start().await;
        
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("nope"))
            .mount(&server)
            .await;
        
        let err = provider(&server)
            .complete(&[Message::user("hi")], &options())
            .await
            .unwrap_err();
        
        assert!(matches!(err, AgentError::Config(_)));
    }

    #[tokio::test]
    async fn test_no_choices() {
        let server = MockServer::start().await;
        
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;
        
        let err = provider(&server)
            .complete(&[Message::user("hi")], &options())
            .await
            .unwrap_err();
        
        assert!(matches!(err, AgentError::Provider(_)));
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockServer::start().await;
        
        Mock::given(method("GET"))
            .and(path("/models"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;
        
        assert!(provider(&server).health_check().await.unwrap());
    }
}
