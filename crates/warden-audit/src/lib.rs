//! Audit trail for agent action decisions
//!
//! An append-only, capped (1000 entries), newest-first log of every
//! authorization decision and executed-operation outcome. Appends are
//! serialized under a single lock that also owns the persistence write, so
//! concurrent writers cannot lose updates to a read-modify-write race.

pub mod error;
pub mod log;
pub mod models;
pub mod storage;

pub use error::{Error, Result};
pub use log::{AuditLog, MAX_ENTRIES};
pub use models::AuditEntry;
pub use storage::{AuditRepository, FileAuditRepository, InMemoryAuditRepository};
