//! Attempt ledger: the append-only history of submitted codes within an epoch.
//!
//! Lockout decisions are always derived from this ledger. Nothing else on the
//! user record caches a count.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which stage an attempt was made against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttemptKind {
    Otp,
    Pairing,
}

impl AttemptKind {
    /// Storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptKind::Otp => "otp",
            AttemptKind::Pairing => "pairing",
        }
    }
}

impl std::fmt::Display for AttemptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptKind::Otp => write!(f, "OTP"),
            AttemptKind::Pairing => write!(f, "pairing"),
        }
    }
}

impl std::str::FromStr for AttemptKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "otp" => Ok(AttemptKind::Otp),
            "pairing" => Ok(AttemptKind::Pairing),
            _ => Err(format!("Unknown attempt kind: {}", s)),
        }
    }
}

/// One submitted code, immutable once recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    pub kind: AttemptKind,
    pub code: String,
    pub created_at: DateTime<Utc>,
}

/// Ordered attempts since the last reset
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttemptLedger(Vec<Attempt>);

impl AttemptLedger {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Builds a ledger from attempts already ordered by creation
    pub fn from_attempts(attempts: Vec<Attempt>) -> Self {
        Self(attempts)
    }

    /// Records an attempt and returns the stored entry
    pub fn append(
        &mut self,
        kind: AttemptKind,
        code: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> &Attempt {
        self.0.push(Attempt {
            kind,
            code: code.into(),
            created_at,
        });
        &self.0[self.0.len() - 1]
    }

    /// Number of attempts of `kind` in the ledger
    pub fn count(&self, kind: AttemptKind) -> u32 {
        self.0.iter().filter(|a| a.kind == kind).count() as u32
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn entries(&self) -> &[Attempt] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
