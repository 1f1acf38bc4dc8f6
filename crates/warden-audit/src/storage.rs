//! Persistence seam for the audit trail
//!
//! The log itself decides what to keep; repositories only load and store the
//! full sequence. A file-backed implementation persists via the shared JSON
//! store, the in-memory one backs tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;
use crate::models::AuditEntry;

/// Repository trait for audit persistence.
pub trait AuditRepository: Send + Sync {
    /// Load the persisted entry sequence (newest-first).
    fn load(&self) -> Result<Vec<AuditEntry>>;

    /// Persist the full entry sequence (newest-first).
    fn store(&self, entries: &[AuditEntry]) -> Result<()>;
}

/// File-backed audit repository.
pub struct FileAuditRepository {
    path: PathBuf,
}

impl FileAuditRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Repository at the conventional `audit_log.json` under a base dir.
    pub fn with_base_dir<P: AsRef<Path>>(base: P) -> Self {
        Self::new(base.as_ref().join("audit_log.json"))
    }
}

impl AuditRepository for FileAuditRepository {
    fn load(&self) -> Result<Vec<AuditEntry>> {
        Ok(warden_common::load_json_or_default(&self.path)?)
    }

    fn store(&self, entries: &[AuditEntry]) -> Result<()> {
        warden_common::save_json(&self.path, &entries)?;
        Ok(())
    }
}

/// In-memory audit repository (for tests).
#[derive(Default)]
pub struct InMemoryAuditRepository {
    entries: Arc<RwLock<Vec<AuditEntry>>>,
}

impl InMemoryAuditRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditRepository for InMemoryAuditRepository {
    fn load(&self) -> Result<Vec<AuditEntry>> {
        Ok(self.entries.read().clone())
    }

    fn store(&self, entries: &[AuditEntry]) -> Result<()> {
        *self.entries.write() = entries.to_vec();
        Ok(())
    }
}
