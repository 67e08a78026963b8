//! Verification service module for the vehicle pairing protocol
//!
//! This module provides the per-user state machine:
//! - OTP verification with attempt tracking and lockout
//! - Pairing code verification with expiry-based lockout
//! - Unlock of a paired vehicle
//! - Agent-initiated reset of the verification epoch

mod binding;
mod config;
mod service;
mod traits;
mod types;
mod validator;

#[cfg(test)]
mod tests;

pub use binding::IdentityBinding;
pub use config::VerificationServiceConfig;
pub use service::VerificationService;
pub use traits::{Clock, FixedClock, SystemClock};
pub use types::OtpVerified;
pub use validator::{CodeCheck, CodeValidator};
