//! Error types for the policy engine

use thiserror::Error;

/// Result type for policy engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the policy engine.
///
/// Authorization itself never surfaces these to callers: any failure during
/// a decision converts to a denial. They appear only on explicit store
/// operations (`set_permission`, `clear_audit_logs`).
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown operation kind: {0}")]
    UnknownOperationKind(String),

    #[error("Policy storage error: {0}")]
    Storage(#[from] warden_common::JsonStoreError),

    #[error("Audit error: {0}")]
    Audit(#[from] warden_audit::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
