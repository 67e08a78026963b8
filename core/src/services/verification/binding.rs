//! Identity binding between a verified session and one client

use constant_time_eq::constant_time_eq;

use crate::domain::entities::BindingToken;

pub struct IdentityBinding;

impl IdentityBinding {
    /// Issues a token for a new verification session
    pub fn issue() -> BindingToken {
        BindingToken::issue()
    }

    /// Checks a presented token against the stored one.
    ///
    /// A missing token on either side is always a mismatch.
    pub fn check(stored: Option<&BindingToken>, presented: Option<&str>) -> bool {
        match (stored, presented) {
            (Some(stored), Some(presented)) if !presented.is_empty() => {
                constant_time_eq(stored.as_str().as_bytes(), presented.as_bytes())
            }
            _ => false,
        }
    }
}
