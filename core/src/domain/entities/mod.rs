//! Domain entities representing core business objects.

pub mod attempt;
pub mod binding_token;
pub mod secret;
pub mod user;

// Re-export commonly used types
pub use attempt::{Attempt, AttemptKind, AttemptLedger};
pub use binding_token::BindingToken;
pub use secret::StoredSecret;
pub use user::User;
