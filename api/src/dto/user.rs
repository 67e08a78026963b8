use serde::{Deserialize, Serialize};
use validator::Validate;

// Fields are optional so a missing value reaches the state machine, which
// reports it in precondition order. Length bounds only reject oversized input.

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(length(max = 32))]
    pub phone: Option<String>,

    #[validate(length(max = 64))]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PairRequest {
    #[validate(length(max = 32))]
    pub phone: Option<String>,

    #[validate(length(max = 64))]
    pub code: Option<String>,

    /// Token returned by a successful OTP verification
    #[validate(length(max = 64))]
    pub binding_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UnlockRequest {
    #[validate(length(max = 32))]
    pub phone: Option<String>,

    #[validate(length(max = 64))]
    pub binding_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ResetRequest {
    #[validate(length(max = 32))]
    pub phone: Option<String>,

    /// Customer agent token
    #[validate(length(max = 256))]
    pub auth_token: Option<String>,
}

/// Development-only code issuance
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CodegenRequest {
    #[validate(length(max = 32))]
    pub phone: Option<String>,

    /// Stored codes are capped by the `users` columns
    #[validate(length(max = 32))]
    pub otp_code: Option<String>,

    #[validate(length(max = 32))]
    pub pairing_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpVerifiedResponse {
    pub message: String,
    pub binding_token: String,
}
