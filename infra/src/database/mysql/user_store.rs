//! MySQL implementation of the user store traits.
//!
//! Users live in `users`, their attempt ledger in `user_attempts`. The
//! transaction primitive locks the user row with `SELECT ... FOR UPDATE`,
//! so every read-modify-write on one phone is serialized while different
//! phones proceed independently.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::{MySqlDatabaseError, MySqlRow};
use sqlx::{MySql, MySqlConnection, MySqlPool, QueryBuilder, Row};
use std::time::Duration;
use vp_shared::phone::mask_phone_number;
use vp_shared::VerificationConfig;

use vp_core::domain::entities::{Attempt, AttemptKind, AttemptLedger, BindingToken, StoredSecret, User};
use vp_core::errors::DomainError;
use vp_core::repositories::user::{LedgerTransaction, UserAdminStore, UserStore, UserUpdate};

use crate::InfrastructureError;

/// MySQL error numbers worth retrying: deadlock and lock wait timeout
const ER_LOCK_DEADLOCK: u16 = 1213;
const ER_LOCK_WAIT_TIMEOUT: u16 = 1205;
const ER_DUP_ENTRY: u16 = 1062;

const USER_COLUMNS: &str = "phone, vehicle_id, binding_token, verified, paired, unlocked, \
    requires_reset, otp_code, otp_issued_at, pairing_code, pairing_issued_at";

/// MySQL implementation of [`UserStore`] and [`UserAdminStore`]
pub struct MySqlUserStore {
    /// Database connection pool
    pool: MySqlPool,
    /// Bound on one whole transaction, retries included
    transaction_timeout: Duration,
    /// Retries after a deadlock or lock wait timeout
    max_retries: u32,
    /// Base delay between retries, scaled by the retry number
    retry_backoff: Duration,
}

impl MySqlUserStore {
    /// Create a store with a 5 second transaction bound and 3 retries
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            pool,
            transaction_timeout: Duration::from_secs(5),
            max_retries: 3,
            retry_backoff: Duration::from_millis(25),
        }
    }

    /// Create a store using the configured transaction bounds
    pub fn from_config(pool: MySqlPool, config: &VerificationConfig) -> Self {
        Self::new(pool).with_transaction_policy(
            Duration::from_secs(config.transaction_timeout_seconds),
            config.transaction_max_retries,
        )
    }

    pub fn with_transaction_policy(mut self, timeout: Duration, max_retries: u32) -> Self {
        self.transaction_timeout = timeout;
        self.max_retries = max_retries;
        self
    }

    /// Run one transaction attempt: lock, load, apply `f`, persist, commit
    async fn run_once<T, F>(&self, phone: &str, f: &F) -> Result<Option<T>, InfrastructureError>
    where
        F: Fn(&mut LedgerTransaction) -> T + Sync,
    {
        let mut tx = self.pool.begin().await?;

        let Some(user) = fetch_user(&mut tx, phone, true).await? else {
            tx.rollback().await?;
            return Ok(None);
        };

        let mut view = LedgerTransaction::begin(user);
        let outcome = f(&mut view);

        if view.has_changes() {
            let (user, appended, update) = view.into_parts();
            persist(&mut tx, &user, &appended, &update).await?;
        }

        tx.commit().await?;
        Ok(Some(outcome))
    }

    /// Retry `run_once` on lock conflicts, with linear backoff
    async fn run_with_retry<T, F>(&self, phone: &str, f: &F) -> Result<Option<T>, InfrastructureError>
    where
        F: Fn(&mut LedgerTransaction) -> T + Sync,
    {
        let mut retry = 0;
        loop {
            match self.run_once(phone, f).await {
                Err(InfrastructureError::Database(e)) if is_lock_conflict(&e) && retry < self.max_retries => {
                    retry += 1;
                    tracing::warn!(
                        phone = %mask_phone_number(phone),
                        retry,
                        error = %e,
                        event = "transaction_retry",
                        "Lock conflict on user row, retrying transaction"
                    );
                    tokio::time::sleep(self.retry_backoff * retry).await;
                }
                other => return other,
            }
        }
    }
}

#[async_trait]
impl UserStore for MySqlUserStore {
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError> {
        let mut conn = self.pool.acquire().await.map_err(InfrastructureError::from)?;
        Ok(fetch_user(&mut conn, phone, false).await?)
    }

    async fn update(&self, phone: &str, update: UserUpdate) -> Result<bool, DomainError> {
        let found = self
            .transaction(phone, move |tx| tx.update(update.clone()))
            .await?;
        Ok(found.is_some())
    }

    async fn transaction<T, F>(&self, phone: &str, f: F) -> Result<Option<T>, DomainError>
    where
        T: Send + 'static,
        F: Fn(&mut LedgerTransaction) -> T + Send + Sync + 'static,
    {
        match tokio::time::timeout(self.transaction_timeout, self.run_with_retry(phone, &f)).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(InfrastructureError::Timeout(format!(
                "User transaction exceeded {:?}",
                self.transaction_timeout
            ))
            .into()),
        }
    }
}

#[async_trait]
impl UserAdminStore for MySqlUserStore {
    async fn insert_user(&self, user: User) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(InfrastructureError::from)?;

        let inserted = sqlx::query(
            "INSERT INTO users (phone, vehicle_id, binding_token, verified, paired, unlocked, \
             requires_reset, otp_code, otp_issued_at, pairing_code, pairing_issued_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.phone)
        .bind(&user.vehicle_id)
        .bind(user.binding_token.as_ref().map(BindingToken::as_str))
        .bind(user.verified)
        .bind(user.paired)
        .bind(user.unlocked)
        .bind(user.requires_reset)
        .bind(user.otp_secret.code())
        .bind(user.otp_secret.issued_at())
        .bind(user.pairing_secret.code())
        .bind(user.pairing_secret.issued_at())
        .execute(&mut *tx)
        .await;

        if let Err(e) = inserted {
            if mysql_error_number(&e) == Some(ER_DUP_ENTRY) {
                return Err(DomainError::Validation {
                    message: "Phone number already registered".to_string(),
                });
            }
            return Err(InfrastructureError::from(e).into());
        }

        insert_attempts(&mut tx, &user.phone, user.attempts.entries()).await?;
        tx.commit().await.map_err(InfrastructureError::from)?;
        Ok(())
    }

    async fn count_users(&self) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(InfrastructureError::from)?;
        Ok(count as u64)
    }

    async fn delete_all(&self) -> Result<u64, DomainError> {
        let mut tx = self.pool.begin().await.map_err(InfrastructureError::from)?;
        sqlx::query("DELETE FROM user_attempts")
            .execute(&mut *tx)
            .await
            .map_err(InfrastructureError::from)?;
        let removed = sqlx::query("DELETE FROM users")
            .execute(&mut *tx)
            .await
            .map_err(InfrastructureError::from)?
            .rows_affected();
        tx.commit().await.map_err(InfrastructureError::from)?;
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

/// Load a user and its ledger, optionally locking the user row
async fn fetch_user(
    conn: &mut MySqlConnection,
    phone: &str,
    lock: bool,
) -> Result<Option<User>, InfrastructureError> {
    let sql = if lock {
        format!("SELECT {} FROM users WHERE phone = ? FOR UPDATE", USER_COLUMNS)
    } else {
        format!("SELECT {} FROM users WHERE phone = ?", USER_COLUMNS)
    };

    let Some(row) = sqlx::query(&sql).bind(phone).fetch_optional(&mut *conn).await? else {
        return Ok(None);
    };
    let mut user = row_to_user(&row)?;

    let attempts = sqlx::query(
        "SELECT kind, code, created_at FROM user_attempts WHERE phone = ? ORDER BY id",
    )
    .bind(phone)
    .fetch_all(&mut *conn)
    .await?
    .iter()
    .map(row_to_attempt)
    .collect::<Result<Vec<_>, _>>()?;
    user.attempts = AttemptLedger::from_attempts(attempts);

    Ok(Some(user))
}

/// Write what a transaction recorded against the locked row
async fn persist(
    conn: &mut MySqlConnection,
    user: &User,
    appended: &[Attempt],
    update: &UserUpdate,
) -> Result<(), InfrastructureError> {
    if update.clear_attempts {
        sqlx::query("DELETE FROM user_attempts WHERE phone = ?")
            .bind(&user.phone)
            .execute(&mut *conn)
            .await?;
        // The ledger after the transaction, whatever order appends and clears happened in
        insert_attempts(conn, &user.phone, user.attempts.entries()).await?;
    } else {
        insert_attempts(conn, &user.phone, appended).await?;
    }

    let mut query: QueryBuilder<MySql> = QueryBuilder::new("UPDATE users SET ");
    let mut columns = 0;
    {
        let mut set = query.separated(", ");
        if let Some(token) = &update.binding_token {
            set.push("binding_token = ")
                .push_bind_unseparated(token.as_ref().map(|t| t.as_str().to_string()));
            columns += 1;
        }
        for (column, value) in [
            ("verified", update.verified),
            ("paired", update.paired),
            ("unlocked", update.unlocked),
            ("requires_reset", update.requires_reset),
        ] {
            if let Some(value) = value {
                set.push(format!("{} = ", column)).push_bind_unseparated(value);
                columns += 1;
            }
        }
        for (code_column, issued_column, secret) in [
            ("otp_code", "otp_issued_at", &update.otp_secret),
            ("pairing_code", "pairing_issued_at", &update.pairing_secret),
        ] {
            if let Some(secret) = secret {
                set.push(format!("{} = ", code_column))
                    .push_bind_unseparated(secret.code().map(str::to_string));
                set.push(format!("{} = ", issued_column))
                    .push_bind_unseparated(secret.issued_at());
                columns += 2;
            }
        }
    }

    if columns > 0 {
        query.push(" WHERE phone = ").push_bind(&user.phone);
        query.build().execute(&mut *conn).await?;
    }

    Ok(())
}

async fn insert_attempts(
    conn: &mut MySqlConnection,
    phone: &str,
    attempts: &[Attempt],
) -> Result<(), InfrastructureError> {
    for attempt in attempts {
        sqlx::query("INSERT INTO user_attempts (phone, kind, code, created_at) VALUES (?, ?, ?, ?)")
            .bind(phone)
            .bind(attempt.kind.as_str())
            .bind(&attempt.code)
            .bind(attempt.created_at)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Convert a `users` row to a User entity with an empty ledger
fn row_to_user(row: &MySqlRow) -> Result<User, InfrastructureError> {
    let secret = |code: &str, issued_at: &str| -> Result<StoredSecret, sqlx::Error> {
        Ok(StoredSecret::from_parts(
            row.try_get::<Option<String>, _>(code)?,
            row.try_get::<Option<DateTime<Utc>>, _>(issued_at)?,
        ))
    };

    Ok(User {
        phone: row.try_get("phone")?,
        vehicle_id: row.try_get("vehicle_id")?,
        binding_token: row
            .try_get::<Option<String>, _>("binding_token")?
            .map(BindingToken::from),
        verified: row.try_get("verified")?,
        paired: row.try_get("paired")?,
        unlocked: row.try_get("unlocked")?,
        requires_reset: row.try_get("requires_reset")?,
        otp_secret: secret("otp_code", "otp_issued_at")?,
        pairing_secret: secret("pairing_code", "pairing_issued_at")?,
        attempts: AttemptLedger::new(),
    })
}

fn row_to_attempt(row: &MySqlRow) -> Result<Attempt, InfrastructureError> {
    let kind: String = row.try_get("kind")?;
    Ok(Attempt {
        kind: kind.parse::<AttemptKind>().map_err(InfrastructureError::Decode)?,
        code: row.try_get("code")?,
        created_at: row.try_get("created_at")?,
    })
}

fn mysql_error_number(error: &sqlx::Error) -> Option<u16> {
    match error {
        sqlx::Error::Database(db) => db
            .try_downcast_ref::<MySqlDatabaseError>()
            .map(MySqlDatabaseError::number),
        _ => None,
    }
}

fn is_lock_conflict(error: &sqlx::Error) -> bool {
    matches!(
        mysql_error_number(error),
        Some(ER_LOCK_DEADLOCK) | Some(ER_LOCK_WAIT_TIMEOUT)
    )
}
