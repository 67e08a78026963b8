//! Types for verification service results

use crate::domain::entities::BindingToken;

/// Result of a successful OTP verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpVerified {
    /// Token the client must present at pairing and unlock
    pub binding_token: BindingToken,
}
