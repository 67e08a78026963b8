//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `agent` - Customer agent authentication
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server configuration
//! - `verification` - OTP / pairing policy constants and transaction bounds

pub mod agent;
pub mod database;
pub mod environment;
pub mod server;
pub mod verification;

use serde::{Deserialize, Serialize};
use std::env;

pub use agent::AgentAuthConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::ServerConfig;
pub use verification::VerificationConfig;

/// Which user store implementation backs the running server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// MySQL through sqlx
    Mysql,
    /// Process-local store, development and tests only
    Memory,
}

impl StoreBackend {
    /// Read `STORE_BACKEND`, defaulting to MySQL
    pub fn from_env() -> Self {
        env::var("STORE_BACKEND")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(StoreBackend::Mysql)
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" => Ok(StoreBackend::Mysql),
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}

/// Configuration problems detected at startup
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The agent token is empty outside development
    #[error("AGENT_AUTH must be set outside the development environment")]
    MissingAgentToken,
    /// A policy value that must be positive is zero
    #[error("{0} must be greater than zero")]
    NonPositive(&'static str),
    /// A duration too large to represent as a signed number of seconds
    #[error("{0} must not exceed {1} seconds")]
    TooLarge(&'static str, u64),
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Verification policy
    pub verification: VerificationConfig,

    /// Agent authentication
    pub agent: AgentAuthConfig,

    /// Store implementation
    pub store: StoreBackend,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            verification: VerificationConfig::default(),
            agent: AgentAuthConfig::default(),
            store: StoreBackend::Mysql,
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment
    ///
    /// Values that fail to parse fall back to their defaults.
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            verification: VerificationConfig::from_env(),
            agent: AgentAuthConfig::from_env(),
            store: StoreBackend::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }

    /// Reject configurations that would leave the service unsafe to run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.environment.is_development() && !self.agent.is_configured() {
            return Err(ConfigError::MissingAgentToken);
        }
        self.verification.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_backend_from_str() {
        assert_eq!("mysql".parse::<StoreBackend>().unwrap(), StoreBackend::Mysql);
        assert_eq!("Memory".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert!("redis".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_validate_requires_agent_token_outside_development() {
        let mut config = AppConfig {
            environment: Environment::Production,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::MissingAgentToken));

        config.agent = AgentAuthConfig::new("agent-secret");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_allows_missing_token_in_development() {
        let config = AppConfig {
            environment: Environment::Development,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::MissingAgentToken.to_string(),
            "AGENT_AUTH must be set outside the development environment"
        );
        assert_eq!(
            ConfigError::NonPositive("OTP_MAX_ATTEMPTS").to_string(),
            "OTP_MAX_ATTEMPTS must be greater than zero"
        );
    }
}
