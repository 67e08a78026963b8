pub mod user;

pub use user::{InMemoryUserStore, LedgerTransaction, UserAdminStore, UserStore, UserUpdate};
