//! Business services containing domain logic and use cases.

pub mod issuance;
pub mod verification;

// Re-export commonly used types
pub use issuance::CodeIssuanceService;
pub use verification::{
    Clock, CodeValidator, FixedClock, IdentityBinding, OtpVerified, SystemClock,
    VerificationService, VerificationServiceConfig,
};
