//! User store traits defining the interface for pairing state persistence.
//!
//! The state machine only sees [`UserStore`]: atomic read, atomic multi-field
//! update, and a transactional read-modify-write primitive. Seeding and code
//! issuance live on [`UserAdminStore`] so verification code paths cannot reach
//! them.

use async_trait::async_trait;

use crate::domain::entities::{StoredSecret, User};
use crate::errors::DomainError;

use super::transaction::LedgerTransaction;
use super::update::UserUpdate;

/// Store trait used by the verification state machine
///
/// # Example
/// ```no_run
/// use vp_core::domain::AttemptKind;
/// use vp_core::repositories::user::{UserStore, UserUpdate};
/// # async fn example(store: &impl UserStore) -> Result<(), vp_core::errors::DomainError> {
/// let now = chrono::Utc::now();
/// let locked = store
///     .transaction("111-222-333", move |tx| {
///         tx.append_attempt(AttemptKind::Otp, "000000", now);
///         if tx.user().attempts.count(AttemptKind::Otp) >= 3 {
///             tx.update(UserUpdate::new().require_reset());
///         }
///         tx.user().requires_reset
///     })
///     .await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by phone number
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found, with its full attempt ledger
    /// * `Ok(None)` - No user with this phone
    /// * `Err(DomainError)` - Store error occurred
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError>;

    /// Atomically apply a field-level update
    ///
    /// Returns `Ok(false)` when no user has this phone.
    async fn update(&self, phone: &str, update: UserUpdate) -> Result<bool, DomainError>;

    /// Run `f` against the user row under an exclusive lock
    ///
    /// The store loads the record, runs `f`, persists the attempts and
    /// updates recorded on the transaction and commits, whatever value `f`
    /// returns. Conflicts may cause `f` to run more than once; only the final
    /// run is committed. A failure or timeout leaves nothing persisted and is
    /// reported as [`DomainError::Internal`].
    ///
    /// # Returns
    /// * `Ok(Some(T))` - Committed, with the value `f` returned
    /// * `Ok(None)` - No user with this phone, `f` never ran
    async fn transaction<T, F>(&self, phone: &str, f: F) -> Result<Option<T>, DomainError>
    where
        T: Send + 'static,
        F: Fn(&mut LedgerTransaction) -> T + Send + Sync + 'static;
}

/// Seeding and code issuance operations
#[async_trait]
pub trait UserAdminStore: Send + Sync {
    /// Insert a new user; fails when the phone is already taken
    async fn insert_user(&self, user: User) -> Result<(), DomainError>;

    async fn count_users(&self) -> Result<u64, DomainError>;

    /// Delete every user and attempt, returning the number of users removed
    async fn delete_all(&self) -> Result<u64, DomainError>;

    /// Overwrite both secrets; `Ok(false)` when no user has this phone
    async fn issue_secrets(
        &self,
        phone: &str,
        otp: StoredSecret,
        pairing: StoredSecret,
    ) -> Result<bool, DomainError>;
}
