//! Field-level updates applied atomically to a single user record

use crate::domain::entities::{BindingToken, StoredSecret, User};

/// Set of fields to overwrite on a user record.
///
/// Unset fields are left untouched. Stores translate this into a single
/// multi-column update; [`UserUpdate::apply`] is the reference semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub binding_token: Option<Option<BindingToken>>,
    pub verified: Option<bool>,
    pub paired: Option<bool>,
    pub unlocked: Option<bool>,
    pub requires_reset: Option<bool>,
    pub otp_secret: Option<StoredSecret>,
    pub pairing_secret: Option<StoredSecret>,
    /// Empties the attempt ledger
    pub clear_attempts: bool,
}

impl UserUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// OTP success: mark verified and bind the token
    pub fn verified(mut self, token: BindingToken) -> Self {
        self.verified = Some(true);
        self.binding_token = Some(Some(token));
        self
    }

    pub fn paired(mut self) -> Self {
        self.paired = Some(true);
        self
    }

    pub fn unlocked(mut self) -> Self {
        self.unlocked = Some(true);
        self
    }

    pub fn require_reset(mut self) -> Self {
        self.requires_reset = Some(true);
        self
    }

    /// Store freshly issued secrets
    pub fn secrets(mut self, otp: StoredSecret, pairing: StoredSecret) -> Self {
        self.otp_secret = Some(otp);
        self.pairing_secret = Some(pairing);
        self
    }

    /// Clear every epoch field, starting a new epoch
    pub fn reset_epoch() -> Self {
        Self {
            binding_token: Some(None),
            verified: Some(false),
            paired: Some(false),
            unlocked: Some(false),
            requires_reset: Some(false),
            otp_secret: Some(StoredSecret::Absent),
            pairing_secret: Some(StoredSecret::Absent),
            clear_attempts: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Folds `later` into this update; fields set in `later` win
    pub fn merge(&mut self, later: UserUpdate) {
        if later.binding_token.is_some() {
            self.binding_token = later.binding_token;
        }
        if later.verified.is_some() {
            self.verified = later.verified;
        }
        if later.paired.is_some() {
            self.paired = later.paired;
        }
        if later.unlocked.is_some() {
            self.unlocked = later.unlocked;
        }
        if later.requires_reset.is_some() {
            self.requires_reset = later.requires_reset;
        }
        if later.otp_secret.is_some() {
            self.otp_secret = later.otp_secret;
        }
        if later.pairing_secret.is_some() {
            self.pairing_secret = later.pairing_secret;
        }
        self.clear_attempts |= later.clear_attempts;
    }

    /// Applies the update to an in-memory record
    pub fn apply(&self, user: &mut User) {
        if let Some(token) = &self.binding_token {
            user.binding_token = token.clone();
        }
        if let Some(verified) = self.verified {
            user.verified = verified;
        }
        if let Some(paired) = self.paired {
            user.paired = paired;
        }
        if let Some(unlocked) = self.unlocked {
            user.unlocked = unlocked;
        }
        if let Some(requires_reset) = self.requires_reset {
            user.requires_reset = requires_reset;
        }
        if let Some(secret) = &self.otp_secret {
            user.otp_secret = secret.clone();
        }
        if let Some(secret) = &self.pairing_secret {
            user.pairing_secret = secret.clone();
        }
        if self.clear_attempts {
            user.attempts.clear();
        }
    }
}
