//! Development seed users
//!
//! Seeding only happens on an empty store; an existing dataset is never
//! touched unless the caller explicitly asks to recreate it.

use vp_core::domain::entities::User;
use vp_core::errors::DomainResult;
use vp_core::repositories::user::UserAdminStore;

/// Seed (phone, vehicle id) pairs
const FIXTURE_USERS: [(&str, &str); 3] = [
    ("111-222-333", "123456"),
    ("123-456-789", "666333"),
    ("444-555-666", "987654"),
];

/// The seed users, each in the initial epoch
pub fn fixture_users() -> Vec<User> {
    FIXTURE_USERS
        .iter()
        .map(|(phone, vehicle_id)| User::new(*phone, *vehicle_id))
        .collect()
}

/// Insert the seed users when the store is empty
///
/// Returns how many users were inserted; zero when data already exists.
pub async fn apply_fixture<A: UserAdminStore>(store: &A) -> DomainResult<usize> {
    let existing = store.count_users().await?;
    if existing > 0 {
        tracing::info!(existing, "User fixture skipped, store already populated");
        return Ok(0);
    }

    let users = fixture_users();
    let inserted = users.len();
    for user in users {
        store.insert_user(user).await?;
    }

    tracing::info!(inserted, "User fixture applied");
    Ok(inserted)
}

/// Delete every user and attempt, then insert the seed users again
pub async fn recreate_users<A: UserAdminStore>(store: &A) -> DomainResult<usize> {
    let removed = store.delete_all().await?;
    tracing::warn!(removed, "All users deleted");
    apply_fixture(store).await
}
