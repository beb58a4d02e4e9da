//! Server Configuration
//!
//! Gateway settings read from the environment (after `.env` is loaded).
//! Provider and dialer credentials are read by their own `from_env`.

use agent_core::provider::DEFAULT_DECISION_MODEL;
use safespace_tools::svckit::DEFAULT_SPECIALIST_MODEL;

/// Gateway settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address (`BIND_ADDR`)
    pub bind_addr: String,
    
    /// Directory holding the built chat UI (`STATIC_DIR`)
    pub static_dir: String,
    
    /// Groq model driving tool selection (`GROQ_MODEL`)
    pub decision_model: String,
    
    /// Ollama model behind the specialist tool (`SPECIALIST_MODEL`)
    pub specialist_model: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
    
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        
        Self {
            bind_addr: get("BIND_ADDR", "0.0.0.0:8000"),
            static_dir: get("STATIC_DIR", "static"),
            decision_model: get("GROQ_MODEL", DEFAULT_DECISION_MODEL),
            specialist_model: get("SPECIALIST_MODEL", DEFAULT_SPECIALIST_MODEL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config.bind_addr, "0.0.0.0:8000");
        assert_eq!(config.static_dir, "static");
        assert_eq!(config.decision_model, "llama-3.1-8b-instant");
        assert_eq!(config.specialist_model, "alibayram/medgemma:4b");
    }

    #[test]
    fn test_overrides_and_blank_values() {
        let env: HashMap<&str, &str> = [
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("GROQ_MODEL", "llama-3.3-70b-versatile"),
            ("SPECIALIST_MODEL", "  "),
        ]
        .into_iter()
        .collect();
        
        let config = ServerConfig::from_lookup(|k| env.get(k).map(|v| (*v).to_string()));
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.decision_model, "llama-3.3-70b-versatile");
        assert_eq!(config.specialist_model, "alibayram/medgemma:4b");
    }
}
