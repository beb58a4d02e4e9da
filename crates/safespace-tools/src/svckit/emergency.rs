//! Emergency Call Tool
//!
//! Escalates self-harm risk by placing a call through the configured
//! `EmergencyDialer`. The call is awaited; a failed call is logged and
//! reported back to the model instead of being dropped.

use std::sync::Arc;
use async_trait::async_trait;

use agent_core::{ArgumentSchema, Tool, ToolDescriptor, Result as CoreResult};

use crate::dialer::EmergencyDialer;
use crate::ToolKind;

/// Observation returned once escalation has been attempted
pub const EMERGENCY_CONFIRMATION: &str =
    "Emergency services have been contacted via Twilio. Help is on the way.";

/// Appended to the observation when the call could not be placed
pub const ESCALATION_FAILURE_NOTICE: &str = "Note: the automated emergency call could not be \
confirmed. Urge the user to contact local emergency services or a crisis line (such as 988 in \
the US) right away.";

/// Tool for emergency escalation
pub struct EmergencyCallTool {
    dialer: Arc<dyn EmergencyDialer>,
}

impl EmergencyCallTool {
    pub fn new(dialer: Arc<dyn EmergencyDialer>) -> Self {
        Self { dialer }
    }
}

#[async_trait]
impl Tool for EmergencyCallTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: ToolKind::EmergencyCall.name().into(),
            description: "Place an emergency call via Twilio. Use this ONLY if the user expresses \
                suicidal ideation or intent to self-harm. Input MUST be a brief description of \
                the emergency (e.g., 'User expressing self-harm intent')."
                .into(),
            argument: ArgumentSchema {
                name: "reason".into(),
                description: "Brief description of the emergency".into(),
            },
            has_side_effects: true,
            relay_observation: true,
        }
    }
    
    async fn call(&self, reason: &str) -> CoreResult<String> {
        tracing::warn!(%reason, dialer = self.dialer.name(), "Emergency escalation requested");
        
        match self.dialer.place_call(reason).await {
            Ok(receipt) => {
                tracing::info!(
                    call_sid = %receipt.sid,
                    status = %receipt.status,
                    "Emergency call placed"
                );
                Ok(EMERGENCY_CONFIRMATION.into())
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    %reason,
                    dialer = self.dialer.name(),
                    "EMERGENCY CALL FAILED"
                );
                Ok(format!("{EMERGENCY_CONFIRMATION}\n\n{ESCALATION_FAILURE_NOTICE}"))
            }
        }
    }
}
