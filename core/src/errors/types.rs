//! Failure kinds of the verification state machine
//!
//! Every stage operation ends in exactly one outcome. Failures are one of the
//! variants below; the transport maps each to a status and a stable code.

use thiserror::Error;
use vp_shared::error_codes;

use crate::domain::{AttemptKind, Stage};

/// Stage-level verification failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("No {field} provided")]
    InvalidInput { field: &'static str },

    #[error("User not found")]
    NotFound,

    #[error("Verification is locked. Contact support to start over")]
    Locked,

    #[error("{required} must be completed first")]
    WrongStage { required: Stage },

    #[error("{stage} already completed")]
    AlreadyPastStage { stage: Stage },

    #[error("Binding token does not match. Requests must come from the verified device")]
    IdentityMismatch,

    #[error("No {kind} code has been issued")]
    NotIssued { kind: AttemptKind },

    #[error("OTP attempts limit reached. Contact support to start over")]
    RateLimited,

    #[error("The {kind} code has expired. Contact support to start over")]
    Expired { kind: AttemptKind },

    #[error("Invalid {kind} code")]
    InvalidCode {
        kind: AttemptKind,
        remaining_attempts: Option<u32>,
    },

    #[error("Invalid agent authentication token")]
    Unauthorized,
}

impl VerificationError {
    /// Stable error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            VerificationError::InvalidInput { .. } => error_codes::INVALID_INPUT,
            VerificationError::NotFound => error_codes::NOT_FOUND,
            VerificationError::Locked => error_codes::LOCKED,
            VerificationError::WrongStage { .. } => error_codes::WRONG_STAGE,
            VerificationError::AlreadyPastStage { .. } => error_codes::ALREADY_PAST_STAGE,
            VerificationError::IdentityMismatch => error_codes::IDENTITY_MISMATCH,
            VerificationError::NotIssued { .. } => error_codes::NOT_ISSUED,
            VerificationError::RateLimited => error_codes::RATE_LIMITED,
            VerificationError::Expired { .. } => error_codes::EXPIRED,
            VerificationError::InvalidCode { .. } => error_codes::INVALID_CODE,
            VerificationError::Unauthorized => error_codes::UNAUTHORIZED,
        }
    }

    /// Remaining OTP attempts, when the failure carries them
    pub fn remaining_attempts(&self) -> Option<u32> {
        match self {
            VerificationError::InvalidCode {
                remaining_attempts, ..
            } => *remaining_attempts,
            _ => None,
        }
    }
}
