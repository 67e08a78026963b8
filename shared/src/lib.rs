//! Shared utilities and common types for the vehicle pairing server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Error response structures and error codes
//! - Utility functions (phone masking for logs)

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AgentAuthConfig, AppConfig, ConfigError, DatabaseConfig, Environment, LogFormat,
    LoggingConfig, ServerConfig, StoreBackend, VerificationConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use utils::phone;
