//! Working view handed to the state machine inside a store transaction

use chrono::{DateTime, Utc};

use crate::domain::entities::{Attempt, AttemptKind, User};

use super::update::UserUpdate;

/// A locked user record plus the changes recorded against it.
///
/// The state machine reads the fresh record, appends attempts and stages
/// field updates; the store persists exactly what was recorded when the
/// closure returns. Reads always reflect the recorded changes.
#[derive(Debug)]
pub struct LedgerTransaction {
    user: User,
    appended: Vec<Attempt>,
    update: UserUpdate,
}

impl LedgerTransaction {
    /// Starts a transaction over a record read under lock
    pub fn begin(user: User) -> Self {
        Self {
            user,
            appended: Vec::new(),
            update: UserUpdate::new(),
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// Appends an attempt to the ledger
    pub fn append_attempt(
        &mut self,
        kind: AttemptKind,
        code: &str,
        created_at: DateTime<Utc>,
    ) -> &Attempt {
        let attempt = self.user.attempts.append(kind, code, created_at).clone();
        self.appended.push(attempt);
        &self.appended[self.appended.len() - 1]
    }

    /// Stages a field update
    pub fn update(&mut self, update: UserUpdate) {
        update.apply(&mut self.user);
        self.update.merge(update);
    }

    /// Attempts appended during this transaction, in order
    pub fn appended(&self) -> &[Attempt] {
        &self.appended
    }

    pub fn pending_update(&self) -> &UserUpdate {
        &self.update
    }

    /// Whether the transaction recorded anything to persist
    pub fn has_changes(&self) -> bool {
        !self.appended.is_empty() || !self.update.is_empty()
    }

    /// Consumes the view into (record after changes, appended attempts, merged update)
    pub fn into_parts(self) -> (User, Vec<Attempt>, UserUpdate) {
        (self.user, self.appended, self.update)
    }
}
