//! Opaque per-epoch token binding a verified identity to one client.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token handed to the client on OTP success and required at every later stage
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BindingToken(String);

impl BindingToken {
    /// Generates a fresh 128-bit random token
    pub fn issue() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for BindingToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for BindingToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
