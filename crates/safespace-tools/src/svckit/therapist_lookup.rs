//! Therapist Lookup Tool
//!
//! Placeholder directory: no real data source is queried yet.

use async_trait::async_trait;

use agent_core::{ArgumentSchema, Tool, ToolDescriptor, Result as CoreResult};

use crate::ToolKind;

/// Tool for finding therapists near a location
pub struct TherapistLookupTool;

#[async_trait]
impl Tool for TherapistLookupTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: ToolKind::TherapistLookup.name().into(),
            description: "Finds and returns a list of licensed therapists near the specified location."
                .into(),
            argument: ArgumentSchema {
                name: "location".into(),
                description: "The name of the city or area".into(),
            },
            has_side_effects: false,
            relay_observation: false,
        }
    }
    
    async fn call(&self, location: &str) -> CoreResult<String> {
        Ok(format!(
            "Therapists near {}: [List of local clinics and contact info]",
            location.trim()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_mentions_location() {
        let out = TherapistLookupTool.call("Boston").await.unwrap();
        assert_eq!(out, "Therapists near Boston: [List of local clinics and contact info]");
    }
}
