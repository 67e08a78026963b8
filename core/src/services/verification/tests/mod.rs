//! Shared fixtures for verification service tests


use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

use crate::domain::entities::{StoredSecret, User};
use crate::repositories::user::InMemoryUserStore;
use crate::services::verification::{FixedClock, VerificationService, VerificationServiceConfig};

pub(super) const PHONE: &str = "555";
pub(super) const OTP: &str = "111111";
pub(super) const PAIRING: &str = "222222";

pub(super) fn issued_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

pub(super) struct Harness {
    pub store: Arc<InMemoryUserStore>,
    pub clock: Arc<FixedClock>,
    pub service: VerificationService<InMemoryUserStore>,
}

/// Phone 555 with both codes issued at `issued_at()`, clock at the same instant
pub(super) fn harness() -> Harness {
    let mut user = User::new(PHONE, "vin-555");
    user.otp_secret = StoredSecret::issued(OTP, issued_at());
    user.pairing_secret = StoredSecret::issued(PAIRING, issued_at());
    harness_with(user)
}

pub(super) fn harness_with(user: User) -> Harness {
    let store = Arc::new(InMemoryUserStore::with_users([user]));
    let clock = Arc::new(FixedClock::new(issued_at()));
    let service = VerificationService::new(store.clone(), VerificationServiceConfig::default())
        .with_clock(clock.clone());
    Harness {
        store,
        clock,
        service,
    }
}
