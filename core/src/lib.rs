//! # Vehicle Pairing Core
//!
//! Core domain layer for the vehicle pairing backend.
//! This crate contains the user entity and its attempt ledger, the
//! verification state machine, store interfaces and error types.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
