//! # Infrastructure Layer
//!
//! Concrete persistence for the vehicle pairing service:
//! - **Database**: MySQL connection pool, embedded migrations and the
//!   transactional user store built on SQLx
//! - **Fixtures**: development seed users
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

use vp_core::errors::DomainError;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Development seed data
pub mod fixtures;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection or query error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A transaction did not finish within its time bound
    #[error("Timeout: {0}")]
    Timeout(String),

    /// A stored value could not be mapped back to a domain type
    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        DomainError::Internal {
            message: error.to_string(),
        }
    }
}
