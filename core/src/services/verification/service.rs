//! Verification state machine: OTP, pairing, unlock and reset stages

use std::sync::Arc;
use vp_shared::phone::mask_phone_number;

use crate::domain::entities::{AttemptKind, User};
use crate::domain::value_objects::Stage;
use crate::errors::{DomainError, DomainResult, VerificationError};
use crate::repositories::user::{UserStore, UserUpdate};

use super::binding::IdentityBinding;
use super::config::VerificationServiceConfig;
use super::traits::{Clock, SystemClock};
use super::types::OtpVerified;
use super::validator::CodeValidator;

/// Verification service driving one user through OTP, pairing and unlock
///
/// Every operation reads the user, checks its preconditions in a fixed order
/// and then performs at most one store transaction. Inside the transaction
/// the preconditions are checked again against the locked record, so two
/// concurrent requests for the same phone never both pass a check that the
/// first one invalidates.
pub struct VerificationService<S: UserStore> {
    /// Transactional user store
    store: Arc<S>,
    /// Time source for expiry checks and attempt timestamps
    clock: Arc<dyn Clock>,
    /// Service configuration
    config: VerificationServiceConfig,
}

impl<S: UserStore> VerificationService<S> {
    /// Create a new verification service on the system clock
    pub fn new(store: Arc<S>, config: VerificationServiceConfig) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &VerificationServiceConfig {
        &self.config
    }

    /// Verify an OTP and bind the session to a fresh token
    ///
    /// Preconditions, first failure wins: phone, code, user exists, not
    /// locked, not yet verified, OTP issued, attempts below the limit.
    /// A wrong code that brings the attempt count to the limit locks the
    /// user and reports the limit as reached.
    ///
    /// # Returns
    ///
    /// * `Ok(OtpVerified)` - The binding token for later stages
    /// * `Err(DomainError)` - A [`VerificationError`] or a store failure
    pub async fn verify_otp(
        &self,
        phone: Option<&str>,
        code: Option<&str>,
    ) -> DomainResult<OtpVerified> {
        let phone = required("phone number", phone)?;
        let code = required("OTP", code)?;
        let masked = mask_phone_number(phone);
        let limit = self.config.otp_attempts_limit;

        let user = self.load(phone).await?;
        otp_preconditions(&user, limit).map_err(|e| rejected(Stage::Otp, &masked, e))?;

        let clock = self.clock.clone();
        let expiry = self.config.otp_expiration;
        let token = IdentityBinding::issue();
        let submitted = code.to_string();

        let decision = self
            .store
            .transaction(phone, move |tx| -> Result<OtpVerified, VerificationError> {
                otp_preconditions(tx.user(), limit)?;
                let now = clock.now();
                let secret = tx.user().otp_secret.clone();

                tx.append_attempt(AttemptKind::Otp, &submitted, now);
                let attempts = tx.user().attempts.count(AttemptKind::Otp);

                if CodeValidator::is_valid(&secret, &submitted, Some(expiry), now) {
                    tx.update(UserUpdate::new().verified(token.clone()));
                    Ok(OtpVerified {
                        binding_token: token.clone(),
                    })
                } else if attempts >= limit {
                    tx.update(UserUpdate::new().require_reset());
                    Err(VerificationError::RateLimited)
                } else {
                    Err(VerificationError::InvalidCode {
                        kind: AttemptKind::Otp,
                        remaining_attempts: Some(limit - attempts),
                    })
                }
            })
            .await
            .map_err(|e| transaction_failed("otp", &masked, e))?
            .ok_or(VerificationError::NotFound)?;

        match decision {
            Ok(verified) => {
                tracing::info!(phone = %masked, event = "otp_verified", "OTP verified, session bound");
                Ok(verified)
            }
            Err(VerificationError::RateLimited) => {
                tracing::warn!(
                    phone = %masked,
                    event = "otp_attempts_exhausted",
                    limit = limit,
                    "OTP attempts limit reached"
                );
                Err(VerificationError::RateLimited.into())
            }
            Err(e) => Err(rejected(Stage::Otp, &masked, e).into()),
        }
    }

    /// Verify a pairing code for a session bound by OTP
    ///
    /// Any attempt made after the pairing code's validity window locks the
    /// user. A wrong code within the window is rejected without a
    /// count-based lockout.
    pub async fn verify_pairing(
        &self,
        phone: Option<&str>,
        code: Option<&str>,
        binding_token: Option<&str>,
    ) -> DomainResult<()> {
        let phone = required("phone number", phone)?;
        let code = required("pairing code", code)?;
        let masked = mask_phone_number(phone);

        let user = self.load(phone).await?;
        pairing_preconditions(&user, binding_token)
            .map_err(|e| rejected(Stage::Pairing, &masked, e))?;

        let clock = self.clock.clone();
        let window = self.config.pairing_expiration;
        let submitted = code.to_string();
        let presented = binding_token.map(str::to_string);

        let decision = self
            .store
            .transaction(phone, move |tx| -> Result<(), VerificationError> {
                pairing_preconditions(tx.user(), presented.as_deref())?;
                let now = clock.now();
                let secret = tx.user().pairing_secret.clone();

                tx.append_attempt(AttemptKind::Pairing, &submitted, now);

                if CodeValidator::is_older_than(&secret, window, now) {
                    tx.update(UserUpdate::new().require_reset());
                    return Err(VerificationError::Expired {
                        kind: AttemptKind::Pairing,
                    });
                }

                if CodeValidator::is_valid(&secret, &submitted, None, now) {
                    tx.update(UserUpdate::new().paired());
                    Ok(())
                } else {
                    Err(VerificationError::InvalidCode {
                        kind: AttemptKind::Pairing,
                        remaining_attempts: None,
                    })
                }
            })
            .await
            .map_err(|e| transaction_failed("pairing", &masked, e))?
            .ok_or(VerificationError::NotFound)?;

        decision.map_err(|e| rejected(Stage::Pairing, &masked, e))?;
        tracing::info!(phone = %masked, event = "vehicle_paired", "Pairing code verified");
        Ok(())
    }

    /// Unlock the paired vehicle
    ///
    /// Writes no ledger entry.
    pub async fn unlock(&self, phone: Option<&str>, binding_token: Option<&str>) -> DomainResult<()> {
        let phone = required("phone number", phone)?;
        let masked = mask_phone_number(phone);

        let user = self.load(phone).await?;
        unlock_preconditions(&user, binding_token)
            .map_err(|e| rejected(Stage::Unlock, &masked, e))?;

        let presented = binding_token.map(str::to_string);
        let decision = self
            .store
            .transaction(phone, move |tx| -> Result<(), VerificationError> {
                unlock_preconditions(tx.user(), presented.as_deref())?;
                tx.update(UserUpdate::new().unlocked());
                Ok(())
            })
            .await
            .map_err(|e| transaction_failed("unlock", &masked, e))?
            .ok_or(VerificationError::NotFound)?;

        decision.map_err(|e| rejected(Stage::Unlock, &masked, e))?;
        tracing::info!(phone = %masked, event = "vehicle_unlocked", "Vehicle unlocked");
        Ok(())
    }

    /// Start a new epoch for the user; agents only
    ///
    /// Idempotent: resetting a user in the initial epoch changes nothing.
    pub async fn reset(&self, phone: Option<&str>, caller_is_agent: bool) -> DomainResult<()> {
        if !caller_is_agent {
            tracing::warn!(event = "reset_unauthorized", "Reset requested without agent credentials");
            return Err(VerificationError::Unauthorized.into());
        }

        let phone = phone
            .filter(|p| !p.is_empty())
            .ok_or(VerificationError::NotFound)?;
        let masked = mask_phone_number(phone);

        let found = self
            .store
            .update(phone, UserUpdate::reset_epoch())
            .await
            .map_err(|e| transaction_failed("reset", &masked, e))?;
        if !found {
            return Err(VerificationError::NotFound.into());
        }

        tracing::info!(phone = %masked, event = "user_reset", "User has been reset by an agent");
        Ok(())
    }

    async fn load(&self, phone: &str) -> DomainResult<User> {
        match self.store.find_by_phone(phone).await? {
            Some(user) => Ok(user),
            None => Err(VerificationError::NotFound.into()),
        }
    }
}

fn required<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, VerificationError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(VerificationError::InvalidInput { field })
}

fn otp_preconditions(user: &User, limit: u32) -> Result<(), VerificationError> {
    if user.requires_reset {
        return Err(VerificationError::Locked);
    }
    if user.verified || user.paired {
        return Err(VerificationError::AlreadyPastStage { stage: Stage::Otp });
    }
    if !user.otp_secret.is_present() {
        return Err(VerificationError::NotIssued {
            kind: AttemptKind::Otp,
        });
    }
    if user.attempts.count(AttemptKind::Otp) >= limit {
        return Err(VerificationError::RateLimited);
    }
    Ok(())
}

fn pairing_preconditions(user: &User, presented: Option<&str>) -> Result<(), VerificationError> {
    if user.requires_reset {
        return Err(VerificationError::Locked);
    }
    if !user.verified || user.binding_token.is_none() {
        return Err(VerificationError::WrongStage {
            required: Stage::Otp,
        });
    }
    if !IdentityBinding::check(user.binding_token.as_ref(), presented) {
        return Err(VerificationError::IdentityMismatch);
    }
    if user.paired {
        return Err(VerificationError::AlreadyPastStage {
            stage: Stage::Pairing,
        });
    }
    if !user.pairing_secret.is_present() {
        return Err(VerificationError::NotIssued {
            kind: AttemptKind::Pairing,
        });
    }
    Ok(())
}

fn unlock_preconditions(user: &User, presented: Option<&str>) -> Result<(), VerificationError> {
    if !user.paired {
        return Err(VerificationError::WrongStage {
            required: Stage::Pairing,
        });
    }
    if !IdentityBinding::check(user.binding_token.as_ref(), presented) {
        return Err(VerificationError::IdentityMismatch);
    }
    if user.unlocked {
        return Err(VerificationError::AlreadyPastStage {
            stage: Stage::Unlock,
        });
    }
    Ok(())
}

/// Logs a rejected request at a level matching its security weight
fn rejected(stage: Stage, masked: &str, error: VerificationError) -> VerificationError {
    match &error {
        VerificationError::IdentityMismatch => tracing::warn!(
            phone = %masked,
            stage = %stage,
            event = "identity_mismatch",
            "Binding token mismatch"
        ),
        VerificationError::Locked | VerificationError::RateLimited => tracing::warn!(
            phone = %masked,
            stage = %stage,
            event = "verification_locked",
            reason = %error,
            "Request rejected for locked user"
        ),
        VerificationError::Expired { .. } => tracing::warn!(
            phone = %masked,
            stage = %stage,
            event = "code_expired",
            "Expired code submitted, user requires reset"
        ),
        VerificationError::InvalidCode {
            remaining_attempts, ..
        } => tracing::info!(
            phone = %masked,
            stage = %stage,
            event = "invalid_code",
            remaining_attempts = ?remaining_attempts,
            "Invalid code submitted"
        ),
        _ => tracing::debug!(
            phone = %masked,
            stage = %stage,
            event = "precondition_failed",
            reason = %error,
            "Request rejected"
        ),
    }
    error
}

fn transaction_failed(operation: &'static str, masked: &str, error: DomainError) -> DomainError {
    tracing::error!(
        phone = %masked,
        operation = operation,
        error = %error,
        event = "transaction_failed",
        "User store transaction failed"
    );
    error
}
