//! The policy store: compiled defaults plus persisted overrides

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::Result;
use crate::policy::{OperationKind, PermissionLevel};
use crate::storage::{PolicyOverrides, PolicyRepository};

/// Persisted mapping from operation kind to permission level.
///
/// Reads take a shared lock and always observe a consistent snapshot;
/// `set_level` holds the write lock across both the map update and the
/// persistence write.
pub struct PolicyStore {
    overrides: RwLock<PolicyOverrides>,
    repository: Arc<dyn PolicyRepository>,
}

impl PolicyStore {
    /// Create a store over a repository, loading persisted overrides.
    pub fn new(repository: Arc<dyn PolicyRepository>) -> Self {
        let overrides = match repository.load() {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!(error = %e, "Failed to load policy overrides, using defaults");
                PolicyOverrides::default()
            }
        };

        Self {
            overrides: RwLock::new(overrides),
            repository,
        }
    }

    /// Effective level for a kind: the persisted override if present, else
    /// the compiled default.
    pub fn level_for(&self, kind: OperationKind) -> PermissionLevel {
        self.overrides
            .read()
            .overrides
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.default_level())
    }

    /// Persist an override, replacing any prior entry for the kind.
    pub fn set_level(&self, kind: OperationKind, level: PermissionLevel) -> Result<()> {
        let mut overrides = self.overrides.write();
        overrides.overrides.insert(kind, level);
        debug!(kind = %kind, level = %level, "Policy override set");
        self.repository.store(&overrides)
    }

    /// Remove an override, restoring the compiled default for the kind.
    pub fn reset_level(&self, kind: OperationKind) -> Result<()> {
        let mut overrides = self.overrides.write();
        overrides.overrides.remove(&kind);
        self.repository.store(&overrides)
    }
}
