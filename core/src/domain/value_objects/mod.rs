//! Value objects shared by the services and error types.

pub mod stage;

pub use stage::Stage;
