//! Code validation against a stored, time-stamped secret
//!
//! Pure functions over a snapshot; safe to call on stale reads.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;

use crate::domain::entities::StoredSecret;

/// Outcome of checking a submitted code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeCheck {
    Valid,
    /// No secret, or a secret without a code
    Absent,
    Mismatch,
    Expired,
}

/// Stateless validator for OTP and pairing codes
pub struct CodeValidator;

impl CodeValidator {
    /// Checks `submitted` against `secret` at `now`.
    ///
    /// Codes are compared exactly, without normalization. With an `expiry`,
    /// a secret whose age is `expiry` or more is expired.
    pub fn check(
        secret: &StoredSecret,
        submitted: &str,
        expiry: Option<Duration>,
        now: DateTime<Utc>,
    ) -> CodeCheck {
        let Some(code) = secret.code() else {
            return CodeCheck::Absent;
        };

        if !constant_time_eq(code.as_bytes(), submitted.as_bytes()) {
            return CodeCheck::Mismatch;
        }

        if let (Some(expiry), Some(age)) = (expiry, secret.age_at(now)) {
            if age >= expiry {
                return CodeCheck::Expired;
            }
        }

        CodeCheck::Valid
    }

    pub fn is_valid(
        secret: &StoredSecret,
        submitted: &str,
        expiry: Option<Duration>,
        now: DateTime<Utc>,
    ) -> bool {
        Self::check(secret, submitted, expiry, now) == CodeCheck::Valid
    }

    /// Whether a secret is strictly older than `window` at `now`
    pub fn is_older_than(secret: &StoredSecret, window: Duration, now: DateTime<Utc>) -> bool {
        secret.age_at(now).map_or(false, |age| age > window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_absent_secret_never_validates() {
        let now = issued_at();
        assert_eq!(
            CodeValidator::check(&StoredSecret::Absent, "123456", None, now),
            CodeCheck::Absent
        );
        assert_eq!(
            CodeValidator::check(&StoredSecret::issued("", now), "", None, now),
            CodeCheck::Absent
        );
    }

    #[test]
    fn test_exact_match_without_normalization() {
        let secret = StoredSecret::issued("123456", issued_at());
        let now = issued_at();
        assert!(CodeValidator::is_valid(&secret, "123456", None, now));
        assert_eq!(CodeValidator::check(&secret, " 123456", None, now), CodeCheck::Mismatch);
        assert_eq!(CodeValidator::check(&secret, "12345", None, now), CodeCheck::Mismatch);
    }

    #[test]
    fn test_expiry_boundary() {
        let secret = StoredSecret::issued("123456", issued_at());
        let expiry = Some(Duration::seconds(300));

        let just_before = issued_at() + Duration::seconds(299);
        assert!(CodeValidator::is_valid(&secret, "123456", expiry, just_before));

        let at_boundary = issued_at() + Duration::seconds(300);
        assert_eq!(
            CodeValidator::check(&secret, "123456", expiry, at_boundary),
            CodeCheck::Expired
        );

        let after = issued_at() + Duration::seconds(301);
        assert!(!CodeValidator::is_valid(&secret, "123456", expiry, after));
    }

    #[test]
    fn test_no_expiry_ignores_age() {
        let secret = StoredSecret::issued("123456", issued_at());
        let much_later = issued_at() + Duration::days(30);
        assert!(CodeValidator::is_valid(&secret, "123456", None, much_later));
    }

    #[test]
    fn test_is_older_than_is_strict() {
        let secret = StoredSecret::issued("1", issued_at());
        let window = Duration::seconds(120);
        assert!(!CodeValidator::is_older_than(&secret, window, issued_at() + window));
        assert!(CodeValidator::is_older_than(
            &secret,
            window,
            issued_at() + Duration::seconds(121)
        ));
        assert!(!CodeValidator::is_older_than(&StoredSecret::Absent, window, issued_at()));
    }
}
