//! Time-stamped secrets written by the code issuance collaborator.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// An OTP or pairing code together with the moment it was issued
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum StoredSecret {
    /// Nothing has been issued in the current epoch
    #[default]
    Absent,
    /// A code issued at `issued_at`
    Present {
        code: String,
        issued_at: DateTime<Utc>,
    },
}

impl StoredSecret {
    /// Creates a present secret
    pub fn issued(code: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        StoredSecret::Present {
            code: code.into(),
            issued_at,
        }
    }

    /// Rebuilds a secret from nullable storage columns.
    ///
    /// Both columns must be set for the secret to be present.
    pub fn from_parts(code: Option<String>, issued_at: Option<DateTime<Utc>>) -> Self {
        match (code, issued_at) {
            (Some(code), Some(issued_at)) => StoredSecret::Present { code, issued_at },
            _ => StoredSecret::Absent,
        }
    }

    /// The stored code, `None` when absent or empty
    pub fn code(&self) -> Option<&str> {
        match self {
            StoredSecret::Present { code, .. } if !code.is_empty() => Some(code),
            _ => None,
        }
    }

    /// Issue timestamp, if any
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        match self {
            StoredSecret::Present { issued_at, .. } => Some(*issued_at),
            StoredSecret::Absent => None,
        }
    }

    /// Whether a usable code has been issued
    pub fn is_present(&self) -> bool {
        self.code().is_some()
    }

    /// Age of the secret at `now`
    pub fn age_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.issued_at().map(|issued_at| now - issued_at)
    }
}
