//! User entity: one record per phone number carrying the pairing state.

use serde::{Deserialize, Serialize};

use super::attempt::AttemptLedger;
use super::binding_token::BindingToken;
use super::secret::StoredSecret;

/// User entity tracking OTP verification, pairing and unlock for one vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Phone number, the stable identifier of the record
    pub phone: String,

    /// Vehicle identifier, immutable after creation
    pub vehicle_id: String,

    /// Token bound at OTP success, cleared on reset
    pub binding_token: Option<BindingToken>,

    /// OTP verified in this epoch
    pub verified: bool,

    /// Vehicle paired in this epoch
    pub paired: bool,

    /// Vehicle unlocked in this epoch
    pub unlocked: bool,

    /// Locked until an agent resets the epoch
    pub requires_reset: bool,

    /// Last issued OTP
    pub otp_secret: StoredSecret,

    /// Last issued pairing code
    pub pairing_secret: StoredSecret,

    /// Attempts since the last reset
    pub attempts: AttemptLedger,
}

impl User {
    /// Creates a user in the initial epoch
    pub fn new(phone: impl Into<String>, vehicle_id: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            vehicle_id: vehicle_id.into(),
            binding_token: None,
            verified: false,
            paired: false,
            unlocked: false,
            requires_reset: false,
            otp_secret: StoredSecret::Absent,
            pairing_secret: StoredSecret::Absent,
            attempts: AttemptLedger::new(),
        }
    }

    /// Whether the stage flags are consistent (`paired ⇒ verified`, `unlocked ⇒ paired`)
    pub fn stages_consistent(&self) -> bool {
        (!self.paired || self.verified) && (!self.unlocked || self.paired)
    }
}
