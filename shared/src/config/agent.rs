//! Customer agent authentication configuration

use serde::{Deserialize, Serialize};

/// Static shared-secret authentication for customer agents
///
/// Agents authenticate by presenting this token; only they may reset a user.
#[derive(Clone, Default, Deserialize, Serialize)]
pub struct AgentAuthConfig {
    /// Shared agent token, empty when not configured
    #[serde(default)]
    pub token: String,
}

impl AgentAuthConfig {
    /// Create a configuration with the given agent token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Read `AGENT_AUTH`
    pub fn from_env() -> Self {
        Self {
            token: std::env::var("AGENT_AUTH").unwrap_or_default(),
        }
    }

    /// Whether a non-empty token is configured
    pub fn is_configured(&self) -> bool {
        !self.token.trim().is_empty()
    }
}

// Keep the token out of debug output.
impl std::fmt::Debug for AgentAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentAuthConfig")
            .field("configured", &self.is_configured())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_configured() {
        assert!(!AgentAuthConfig::default().is_configured());
        assert!(!AgentAuthConfig::new("   ").is_configured());
        assert!(AgentAuthConfig::new("secret").is_configured());
    }

    #[test]
    fn test_debug_hides_token() {
        let debug = format!("{:?}", AgentAuthConfig::new("super-secret"));
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("configured: true"));
    }
}
