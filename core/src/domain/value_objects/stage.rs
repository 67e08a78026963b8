//! Protocol stages, in the order a client must complete them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Otp,
    Pairing,
    Unlock,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Otp => write!(f, "OTP verification"),
            Stage::Pairing => write!(f, "Pairing"),
            Stage::Unlock => write!(f, "Unlock"),
        }
    }
}
