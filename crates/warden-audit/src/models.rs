//! Audit entry data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One immutable record of an authorization decision or an executed
/// operation's outcome.
///
/// The operation is stored as its stable wire id (`file:read`,
/// `shell:execute`, ...) so the audit store stays independent of the engine
/// crate's types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique identifier for this entry
    pub id: String,
    /// When the decision was made
    pub timestamp: DateTime<Utc>,
    /// Operation wire id
    pub operation: String,
    /// Path or command line the decision was about
    pub target: String,
    /// Whether the action was granted (or, for outcome entries, succeeded)
    pub success: bool,
    /// Structured detail: denial reason, result size, error text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl AuditEntry {
    /// Create a new entry with the current timestamp.
    pub fn new(operation: impl Into<String>, target: impl Into<String>, success: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            operation: operation.into(),
            target: target.into(),
            success,
            detail: None,
        }
    }

    /// Attach a detail string (reason, size, error text).
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
