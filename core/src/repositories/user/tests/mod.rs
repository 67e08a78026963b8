//! Unit tests for the in-memory user store and transaction view

use chrono::Utc;

use crate::domain::entities::{AttemptKind, BindingToken, StoredSecret, User};
use crate::errors::DomainError;
use crate::repositories::user::{
    InMemoryUserStore, LedgerTransaction, UserAdminStore, UserStore, UserUpdate,
};

fn seeded() -> InMemoryUserStore {
    InMemoryUserStore::with_users([User::new("111-222-333", "123456")])
}

#[tokio::test]
async fn test_find_by_phone() {
    let store = seeded();

    let found = store.find_by_phone("111-222-333").await.unwrap();
    assert_eq!(found.unwrap().vehicle_id, "123456");

    assert!(store.find_by_phone("999").await.unwrap().is_none());
}

#[tokio::test]
async fn test_insert_duplicate_phone() {
    let store = seeded();

    let result = store.insert_user(User::new("111-222-333", "other")).await;
    assert!(matches!(result, Err(DomainError::Validation { .. })));
    assert_eq!(store.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn test_update_unknown_phone() {
    let store = seeded();
    assert!(!store.update("999", UserUpdate::new().paired()).await.unwrap());
}

#[tokio::test]
async fn test_issue_secrets() {
    let store = seeded();
    let now = Utc::now();

    let issued = store
        .issue_secrets(
            "111-222-333",
            StoredSecret::issued("111111", now),
            StoredSecret::issued("222222", now),
        )
        .await
        .unwrap();
    assert!(issued);

    let user = store.find_by_phone("111-222-333").await.unwrap().unwrap();
    assert_eq!(user.otp_secret.code(), Some("111111"));
    assert_eq!(user.pairing_secret.code(), Some("222222"));
}

#[tokio::test]
async fn test_transaction_persists_attempts_and_updates() {
    let store = seeded();
    let now = Utc::now();

    let count = store
        .transaction("111-222-333", move |tx| {
            tx.append_attempt(AttemptKind::Otp, "000000", now);
            tx.update(UserUpdate::new().require_reset());
            tx.user().attempts.count(AttemptKind::Otp)
        })
        .await
        .unwrap();
    assert_eq!(count, Some(1));

    let user = store.find_by_phone("111-222-333").await.unwrap().unwrap();
    assert_eq!(user.attempts.len(), 1);
    assert_eq!(user.attempts.entries()[0].code, "000000");
    assert!(user.requires_reset);
}

#[tokio::test]
async fn test_transaction_unknown_phone_does_not_run() {
    let store = seeded();

    let outcome: Option<()> = store
        .transaction("999", |_tx| panic!("closure must not run"))
        .await
        .unwrap();
    assert!(outcome.is_none());
}

#[tokio::test]
async fn test_failed_transaction_leaves_no_mutation() {
    let store = seeded();
    store.set_fail_transactions(true);
    let now = Utc::now();

    let result = store
        .transaction("111-222-333", move |tx| {
            tx.append_attempt(AttemptKind::Otp, "000000", now);
        })
        .await;
    assert!(matches!(result, Err(DomainError::Internal { .. })));

    let user = store.find_by_phone("111-222-333").await.unwrap().unwrap();
    assert!(user.attempts.is_empty());
}

#[tokio::test]
async fn test_reset_epoch_update() {
    let store = seeded();
    let now = Utc::now();
    store
        .transaction("111-222-333", move |tx| {
            tx.append_attempt(AttemptKind::Otp, "123", now);
            tx.update(UserUpdate::new().verified(BindingToken::issue()).paired());
        })
        .await
        .unwrap();

    assert!(store.update("111-222-333", UserUpdate::reset_epoch()).await.unwrap());

    let user = store.find_by_phone("111-222-333").await.unwrap().unwrap();
    assert_eq!(user, User::new("111-222-333", "123456"));
}

#[tokio::test]
async fn test_delete_all() {
    let store = seeded();
    store.insert_user(User::new("123-456-789", "666333")).await.unwrap();

    assert_eq!(store.delete_all().await.unwrap(), 2);
    assert_eq!(store.count_users().await.unwrap(), 0);
}

#[test]
fn test_ledger_transaction_reads_its_own_writes() {
    let now = Utc::now();
    let mut tx = LedgerTransaction::begin(User::new("p", "v"));
    assert!(!tx.has_changes());

    tx.append_attempt(AttemptKind::Pairing, "1", now);
    tx.update(UserUpdate::new().paired());
    tx.update(UserUpdate::new().require_reset());

    assert_eq!(tx.user().attempts.count(AttemptKind::Pairing), 1);
    assert!(tx.user().paired && tx.user().requires_reset);
    assert_eq!(tx.appended().len(), 1);
    assert_eq!(tx.pending_update().paired, Some(true));
    assert_eq!(tx.pending_update().requires_reset, Some(true));
}

#[test]
fn test_update_merge_later_wins() {
    let mut update = UserUpdate::new().paired();
    update.merge(UserUpdate::reset_epoch());

    assert_eq!(update.paired, Some(false));
    assert!(update.clear_attempts);
    assert!(!update.is_empty());
    assert!(UserUpdate::new().is_empty());
}
