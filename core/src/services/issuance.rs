//! Code issuance: records caller-supplied OTP and pairing codes for a user
//!
//! Stands in for the external issuance collaborator in development. Codes are
//! never generated here and never logged.

use std::sync::Arc;
use vp_shared::phone::mask_phone_number;

use crate::domain::entities::StoredSecret;
use crate::errors::{DomainResult, VerificationError};
use crate::repositories::user::UserAdminStore;
use crate::services::verification::{Clock, SystemClock};

pub struct CodeIssuanceService<A: UserAdminStore> {
    store: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<A: UserAdminStore> CodeIssuanceService<A> {
    pub fn new(store: Arc<A>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Stores both codes, stamped with the current time
    pub async fn issue_codes(
        &self,
        phone: Option<&str>,
        otp_code: Option<&str>,
        pairing_code: Option<&str>,
    ) -> DomainResult<()> {
        let phone = non_empty("phone number", phone)?;
        let otp_code = non_empty("OTP", otp_code)?;
        let pairing_code = non_empty("pairing code", pairing_code)?;

        let now = self.clock.now();
        let issued = self
            .store
            .issue_secrets(
                phone,
                StoredSecret::issued(otp_code, now),
                StoredSecret::issued(pairing_code, now),
            )
            .await?;
        if !issued {
            return Err(VerificationError::NotFound.into());
        }

        tracing::info!(
            phone = %mask_phone_number(phone),
            event = "codes_issued",
            "Stored new OTP and pairing codes"
        );
        Ok(())
    }
}

fn non_empty<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, VerificationError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(VerificationError::InvalidInput { field })
}
