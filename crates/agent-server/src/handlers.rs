//! HTTP Handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use agent_core::{AgentReply, extract_reply};

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub decision_model_connected: bool,
    pub specialist_model_connected: bool,
    pub emergency_dialer_configured: bool,
    pub tools: Vec<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let decision_model_connected = state.agent.provider().health_check().await.unwrap_or(false);
    let specialist_model_connected = state.specialist.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        decision_model_connected,
        specialist_model_connected,
        emergency_dialer_configured: state.dialer.is_configured(),
        tools: state.agent.tools().names().into_iter().map(String::from).collect(),
    })
}

/// Route one message through the agent
///
/// Always answers 200 with `{response, tool_called}`; every functional
/// failure, including a panic inside the loop, becomes the fallback reply.
pub async fn ask_handler(
    State(state): State<AppState>,
    Json(payload): Json<AskRequest>,
) -> Json<AgentReply> {
    tracing::info!(chars = payload.message.chars().count(), "Received message");

    let agent = Arc::clone(&state.agent);
    let outcome = tokio::spawn(async move { agent.run(&payload.message).await }).await;

    let reply = match outcome {
        Ok(result) => extract_reply(result),
        Err(e) => {
            tracing::error!(error = %e, "Agent task did not complete");
            AgentReply::fallback()
        }
    };

    tracing::info!(tool_called = %reply.tool_called, "Replying");
    Json(reply)
}
