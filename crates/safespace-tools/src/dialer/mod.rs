//! Emergency Dialer Integration
//!
//! Abstraction over the service that places the outbound emergency call.

mod twilio;
mod unconfigured;

pub use twilio::{TwilioConfig, TwilioDialer};
pub use unconfigured::UnconfiguredDialer;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Proof that the calling service accepted the call
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CallReceipt {
    /// Provider call identifier
    pub sid: String,
    
    /// Provider-reported status (e.g., "queued")
    pub status: String,
    
    pub placed_at: DateTime<Utc>,
}

/// Emergency dialer trait (Strategy pattern)
#[async_trait]
pub trait EmergencyDialer: Send + Sync {
    /// Place a call to the configured emergency contact
    async fn place_call(&self, reason: &str) -> Result<CallReceipt>;
    
    /// Whether calls can actually be placed
    fn is_configured(&self) -> bool {
        true
    }
    
    /// Dialer name
    fn name(&self) -> &str;
}
