//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

pub use types::VerificationError;

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// Store or transaction failure; reported to callers as a server error
    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Verification(#[from] VerificationError),
}

impl DomainError {
    /// Whether the error should be reported without detail
    pub fn is_internal(&self) -> bool {
        matches!(self, DomainError::Internal { .. })
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
