//! Dialer used when no calling service is configured

use async_trait::async_trait;

use super::{CallReceipt, EmergencyDialer};
use crate::error::{DialerError, Result};

/// Refuses every call, naming what is missing
pub struct UnconfiguredDialer {
    missing: String,
}

impl UnconfiguredDialer {
    pub fn new(missing: impl Into<String>) -> Self {
        Self { missing: missing.into() }
    }
}

#[async_trait]
impl EmergencyDialer for UnconfiguredDialer {
    async fn place_call(&self, _reason: &str) -> Result<CallReceipt> {
        Err(DialerError::NotConfigured(self.missing.clone()))
    }
    
    fn is_configured(&self) -> bool {
        false
    }
    
    fn name(&self) -> &'static str {
        "Unconfigured"
    }
}
