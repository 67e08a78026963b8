//! Shared error types and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Standard error response structure used across all API endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for client identification
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Additional error details (remaining attempts, field name, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Add a detail field to the error response
    pub fn add_detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let details = self.details.get_or_insert_with(HashMap::new);
        if let Ok(json_value) = serde_json::to_value(value) {
            details.insert(key.into(), json_value);
        }
        self
    }
}

/// Error codes returned by the pairing API
pub mod error_codes {
    pub const INVALID_INPUT: &str = "INVALID_INPUT";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const LOCKED: &str = "LOCKED";
    pub const WRONG_STAGE: &str = "WRONG_STAGE";
    pub const ALREADY_PAST_STAGE: &str = "ALREADY_PAST_STAGE";
    pub const IDENTITY_MISMATCH: &str = "IDENTITY_MISMATCH";
    pub const NOT_ISSUED: &str = "NOT_ISSUED";
    pub const RATE_LIMITED: &str = "RATE_LIMITED";
    pub const EXPIRED: &str = "EXPIRED";
    pub const INVALID_CODE: &str = "INVALID_CODE";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_detail() {
        let response = ErrorResponse::new(error_codes::INVALID_CODE, "Invalid OTP code")
            .add_detail("remaining_attempts", 2);

        assert_eq!(response.error, "INVALID_CODE");
        let details = response.details.unwrap();
        assert_eq!(details["remaining_attempts"], serde_json::json!(2));
    }

    #[test]
    fn test_details_omitted_when_empty() {
        let json = serde_json::to_value(ErrorResponse::new(error_codes::NOT_FOUND, "missing")).unwrap();
        assert!(json.get("details").is_none());
        assert_eq!(json["error"], "NOT_FOUND");
    }
}
