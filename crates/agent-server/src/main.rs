//! SafeSpace HTTP Server
//!
//! Axum gateway exposing the mental-health agent over `POST /ask`
//! and serving the chat UI.

mod config;
mod handlers;
mod routes;
mod state;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{AgentBuilder, LlmProvider};
use agent_runtime::{GroqProvider, OllamaProvider};
use safespace_tools::{
    safespace_registry, DialerError, EmergencyDialer, TwilioConfig, TwilioDialer,
    UnconfiguredDialer, SAFESPACE_PROMPT,
};

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment before anything reads it
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    // Decision model (Groq)
    let decision: Arc<dyn LlmProvider> = Arc::new(GroqProvider::from_env()?);
    match decision.health_check().await {
        Ok(true) => tracing::info!("✓ Connected to Groq ({})", config.decision_model),
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ Groq not reachable - every request will fall back");
        }
    }

    // Specialist model (Ollama)
    let specialist: Arc<dyn LlmProvider> = Arc::new(OllamaProvider::from_env());
    match specialist.health_check().await {
        Ok(true) => tracing::info!("✓ Connected to Ollama ({})", config.specialist_model),
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ Ollama not available - specialist tool will fail");
            tracing::warn!("  Make sure Ollama is running: ollama serve");
        }
    }

    // Emergency dialer (Twilio)
    let twilio = TwilioConfig::from_env().and_then(TwilioDialer::new);
    let dialer: Arc<dyn EmergencyDialer> = match twilio {
        Ok(dialer) => {
            tracing::info!("✓ Twilio configured");
            Arc::new(dialer)
        }
        Err(DialerError::NotConfigured(missing)) => {
            tracing::warn!("⚠ Twilio not configured - emergency calls will not be placed");
            tracing::warn!("  Missing: {}", missing);
            Arc::new(UnconfiguredDialer::new(missing))
        }
        Err(e) => {
            tracing::warn!("⚠ Twilio client unavailable - emergency calls will not be placed");
            tracing::warn!("  {}", e);
            Arc::new(UnconfiguredDialer::new("Twilio client"))
        }
    };

    // Tools
    let tools = safespace_registry(specialist.clone(), &config.specialist_model, dialer.clone());
    tracing::info!("Registered {} tools:", tools.len());
    for name in tools.names() {
        tracing::info!("  • {}", name);
    }

    let agent = AgentBuilder::new()
        .provider(decision)
        .tools(tools)
        .prompt_template(SAFESPACE_PROMPT)
        .model(config.decision_model.clone())
        .build()?;

    // Build application state
    let state = AppState {
        agent: Arc::new(agent),
        specialist,
        dialer,
    };

    let app = routes::router(state, &config.static_dir);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 SafeSpace server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health - Health check");
    tracing::info!("  POST /ask    - Send message");
    tracing::info!("  GET  /       - Chat UI ({})", config.static_dir);
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
