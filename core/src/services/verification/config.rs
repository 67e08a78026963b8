//! Configuration for the verification service

use chrono::Duration;
use vp_shared::config::verification::{
    DEFAULT_OTP_ATTEMPTS_LIMIT, DEFAULT_OTP_EXPIRATION_SECONDS, DEFAULT_PAIRING_EXPIRATION_SECONDS,
    MAX_WINDOW_SECONDS,
};
use vp_shared::VerificationConfig;

/// Policy constants for the verification state machine
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// OTP validity window; a code this old or older is rejected
    pub otp_expiration: Duration,
    /// OTP attempts per epoch before the user requires a reset
    pub otp_attempts_limit: u32,
    /// Pairing code validity window; any attempt after it locks the user
    pub pairing_expiration: Duration,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            otp_expiration: Duration::seconds(DEFAULT_OTP_EXPIRATION_SECONDS as i64),
            otp_attempts_limit: DEFAULT_OTP_ATTEMPTS_LIMIT,
            pairing_expiration: Duration::seconds(DEFAULT_PAIRING_EXPIRATION_SECONDS as i64),
        }
    }
}

impl From<&VerificationConfig> for VerificationServiceConfig {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            otp_expiration: window(config.otp_expiration_seconds),
            otp_attempts_limit: config.otp_attempts_limit,
            pairing_expiration: window(config.pairing_expiration_seconds),
        }
    }
}

/// Seconds to a window, saturating at [`MAX_WINDOW_SECONDS`]
fn window(seconds: u64) -> Duration {
    let seconds = i64::try_from(seconds.min(MAX_WINDOW_SECONDS)).unwrap_or(i64::MAX);
    Duration::seconds(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_shared_config() {
        let config = VerificationServiceConfig::from(&VerificationConfig::default());
        assert_eq!(config.otp_expiration, Duration::seconds(300));
        assert_eq!(config.pairing_expiration, Duration::seconds(120));
    }

    #[test]
    fn test_huge_window_does_not_wrap() {
        let shared = VerificationConfig {
            otp_expiration_seconds: u64::MAX,
            ..Default::default()
        };
        let config = VerificationServiceConfig::from(&shared);
        assert!(config.otp_expiration > Duration::zero());
        assert_eq!(config.otp_expiration, Duration::seconds(MAX_WINDOW_SECONDS as i64));
    }
}
