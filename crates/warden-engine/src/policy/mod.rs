//! Policy data model and store

pub mod models;
pub mod store;

pub use models::{OperationKind, PermissionLevel};
pub use store::PolicyStore;
