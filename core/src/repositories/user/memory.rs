//! In-memory user store for tests and single-process development

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::{StoredSecret, User};
use crate::errors::DomainError;

use super::trait_::{UserAdminStore, UserStore};
use super::transaction::LedgerTransaction;
use super::update::UserUpdate;

/// User store backed by a process-local map.
///
/// A transaction holds the write lock for its whole duration, which
/// serializes every operation on every phone.
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<String, User>>>,
    fail_transactions: AtomicBool,
}

impl InMemoryUserStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            fail_transactions: AtomicBool::new(false),
        }
    }

    /// Create a store seeded with `users`
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let map = users.into_iter().map(|u| (u.phone.clone(), u)).collect();
        Self {
            users: Arc::new(RwLock::new(map)),
            fail_transactions: AtomicBool::new(false),
        }
    }

    /// Make every following transaction fail before touching any record
    pub fn set_fail_transactions(&self, fail: bool) {
        self.fail_transactions.store(fail, Ordering::SeqCst);
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(phone).cloned())
    }

    async fn update(&self, phone: &str, update: UserUpdate) -> Result<bool, DomainError> {
        let mut users = self.users.write().await;
        match users.get_mut(phone) {
            Some(user) => {
                update.apply(user);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn transaction<T, F>(&self, phone: &str, f: F) -> Result<Option<T>, DomainError>
    where
        T: Send + 'static,
        F: Fn(&mut LedgerTransaction) -> T + Send + Sync + 'static,
    {
        if self.fail_transactions.load(Ordering::SeqCst) {
            return Err(DomainError::Internal {
                message: "Transaction aborted by the in-memory store".to_string(),
            });
        }

        let mut users = self.users.write().await;
        let Some(current) = users.get(phone) else {
            return Ok(None);
        };

        let mut tx = LedgerTransaction::begin(current.clone());
        let outcome = f(&mut tx);
        if tx.has_changes() {
            let (user, _, _) = tx.into_parts();
            users.insert(phone.to_string(), user);
        }
        Ok(Some(outcome))
    }
}

#[async_trait]
impl UserAdminStore for InMemoryUserStore {
    async fn insert_user(&self, user: User) -> Result<(), DomainError> {
        let mut users = self.users.write().await;

        if users.contains_key(&user.phone) {
            return Err(DomainError::Validation {
                message: "Phone number already registered".to_string(),
            });
        }

        users.insert(user.phone.clone(), user);
        Ok(())
    }

    async fn count_users(&self) -> Result<u64, DomainError> {
        let users = self.users.read().await;
        Ok(users.len() as u64)
    }

    async fn delete_all(&self) -> Result<u64, DomainError> {
        let mut users = self.users.write().await;
        let removed = users.len() as u64;
        users.clear();
        Ok(removed)
    }

    async fn issue_secrets(
        &self,
        phone: &str,
        otp: StoredSecret,
        pairing: StoredSecret,
    ) -> Result<bool, DomainError> {
        self.update(phone, UserUpdate::new().secrets(otp, pairing)).await
    }
}
