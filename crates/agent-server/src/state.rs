//! Application State

use std::sync::Arc;

use agent_core::{Agent, LlmProvider};
use safespace_tools::EmergencyDialer;

/// Shared application state (read-only after startup)
#[derive(Clone)]
pub struct AppState {
    /// Decision loop: Groq provider + SafeSpace tool registry
    pub agent: Arc<Agent>,
    
    /// Specialist model backend, for health reporting
    pub specialist: Arc<dyn LlmProvider>,
    
    /// Emergency dialer, for health reporting
    pub dialer: Arc<dyn EmergencyDialer>,
}
