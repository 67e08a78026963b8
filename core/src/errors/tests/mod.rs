//! Unit tests for domain error types

use crate::domain::{AttemptKind, Stage};
use crate::errors::{DomainError, VerificationError};

#[test]
fn test_verification_error_messages() {
    let error = VerificationError::InvalidInput { field: "phone number" };
    assert_eq!(error.to_string(), "No phone number provided");

    let error = VerificationError::WrongStage { required: Stage::Otp };
    assert_eq!(error.to_string(), "OTP verification must be completed first");

    let error = VerificationError::AlreadyPastStage { stage: Stage::Unlock };
    assert_eq!(error.to_string(), "Unlock already completed");

    let error = VerificationError::NotIssued { kind: AttemptKind::Pairing };
    assert_eq!(error.to_string(), "No pairing code has been issued");
}

#[test]
fn test_error_codes() {
    assert_eq!(VerificationError::Locked.error_code(), "LOCKED");
    assert_eq!(VerificationError::IdentityMismatch.error_code(), "IDENTITY_MISMATCH");
    assert_eq!(VerificationError::RateLimited.error_code(), "RATE_LIMITED");
    assert_eq!(
        VerificationError::Expired { kind: AttemptKind::Pairing }.error_code(),
        "EXPIRED"
    );
}

#[test]
fn test_remaining_attempts() {
    let error = VerificationError::InvalidCode {
        kind: AttemptKind::Otp,
        remaining_attempts: Some(2),
    };
    assert_eq!(error.remaining_attempts(), Some(2));
    assert_eq!(VerificationError::NotFound.remaining_attempts(), None);
}

#[test]
fn test_domain_error_conversion() {
    let error: DomainError = VerificationError::Unauthorized.into();
    assert!(matches!(error, DomainError::Verification(VerificationError::Unauthorized)));
    assert!(!error.is_internal());
    assert_eq!(error.to_string(), "Invalid agent authentication token");

    let error = DomainError::Internal { message: "deadlock".to_string() };
    assert!(error.is_internal());
}
