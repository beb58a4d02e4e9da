//! Service Kit - Agent Tools
//!
//! The three tools the decision model can pick, each implementing
//! `agent_core::Tool`.

mod specialist;
mod emergency;
mod therapist_lookup;

pub use specialist::{SpecialistTool, DEFAULT_SPECIALIST_MODEL};
pub use emergency::{EmergencyCallTool, EMERGENCY_CONFIRMATION, ESCALATION_FAILURE_NOTICE};
pub use therapist_lookup::TherapistLookupTool;
