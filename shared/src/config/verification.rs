//! Verification policy configuration
//!
//! The protocol itself specifies no expiration for OTP or pairing codes, so
//! both windows are policy constants that can be tuned per deployment.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Default OTP validity window in seconds (5 minutes)
pub const DEFAULT_OTP_EXPIRATION_SECONDS: u64 = 5 * 60;

/// Default number of OTP attempts per epoch
pub const DEFAULT_OTP_ATTEMPTS_LIMIT: u32 = 3;

/// Default pairing code validity window in seconds (2 minutes)
pub const DEFAULT_PAIRING_EXPIRATION_SECONDS: u64 = 2 * 60;

/// Largest accepted validity window in seconds (one year)
pub const MAX_WINDOW_SECONDS: u64 = 365 * 24 * 60 * 60;

/// Verification policy and store transaction bounds
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// OTP validity window in seconds
    #[serde(default = "default_otp_expiration")]
    pub otp_expiration_seconds: u64,

    /// OTP attempts allowed before the user requires a reset
    #[serde(default = "default_otp_attempts_limit")]
    pub otp_attempts_limit: u32,

    /// Pairing code validity window in seconds
    #[serde(default = "default_pairing_expiration")]
    pub pairing_expiration_seconds: u64,

    /// Upper bound for a single store transaction in seconds
    #[serde(default = "default_transaction_timeout")]
    pub transaction_timeout_seconds: u64,

    /// Retries on lock conflicts before a transaction is reported as failed
    #[serde(default = "default_transaction_retries")]
    pub transaction_max_retries: u32,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            otp_expiration_seconds: default_otp_expiration(),
            otp_attempts_limit: default_otp_attempts_limit(),
            pairing_expiration_seconds: default_pairing_expiration(),
            transaction_timeout_seconds: default_transaction_timeout(),
            transaction_max_retries: default_transaction_retries(),
        }
    }
}

impl VerificationConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            otp_expiration_seconds: env_or("OTP_EXPIRATION_SECONDS", defaults.otp_expiration_seconds),
            otp_attempts_limit: env_or("OTP_ATTEMPTS_LIMIT", defaults.otp_attempts_limit),
            pairing_expiration_seconds: env_or(
                "PAIRING_EXPIRATION_SECONDS",
                defaults.pairing_expiration_seconds,
            ),
            transaction_timeout_seconds: env_or(
                "TRANSACTION_TIMEOUT_SECONDS",
                defaults.transaction_timeout_seconds,
            ),
            transaction_max_retries: env_or(
                "TRANSACTION_MAX_RETRIES",
                defaults.transaction_max_retries,
            ),
        }
    }

    /// Check that every window and limit is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.otp_expiration_seconds == 0 {
            return Err(ConfigError::NonPositive("OTP_EXPIRATION_SECONDS"));
        }
        if self.otp_expiration_seconds > MAX_WINDOW_SECONDS {
            return Err(ConfigError::TooLarge("OTP_EXPIRATION_SECONDS", MAX_WINDOW_SECONDS));
        }
        if self.otp_attempts_limit == 0 {
            return Err(ConfigError::NonPositive("OTP_ATTEMPTS_LIMIT"));
        }
        if self.pairing_expiration_seconds == 0 {
            return Err(ConfigError::NonPositive("PAIRING_EXPIRATION_SECONDS"));
        }
        if self.pairing_expiration_seconds > MAX_WINDOW_SECONDS {
            return Err(ConfigError::TooLarge(
                "PAIRING_EXPIRATION_SECONDS",
                MAX_WINDOW_SECONDS,
            ));
        }
        if self.transaction_timeout_seconds == 0 {
            return Err(ConfigError::NonPositive("TRANSACTION_TIMEOUT_SECONDS"));
        }
        Ok(())
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn default_otp_expiration() -> u64 {
    DEFAULT_OTP_EXPIRATION_SECONDS
}

fn default_otp_attempts_limit() -> u32 {
    DEFAULT_OTP_ATTEMPTS_LIMIT
}

fn default_pairing_expiration() -> u64 {
    DEFAULT_PAIRING_EXPIRATION_SECONDS
}

fn default_transaction_timeout() -> u64 {
    5
}

fn default_transaction_retries() -> u32 {
    3
}
