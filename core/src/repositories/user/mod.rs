pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
pub mod memory;
pub mod transaction;
pub mod update;

#[cfg(test)]
mod tests;

pub use memory::InMemoryUserStore;
pub use r#trait::{UserAdminStore, UserStore};
pub use transaction::LedgerTransaction;
pub use update::UserUpdate;
