//! Persistence seam for policy overrides
//!
//! Overrides live in their own `permissions.json`, independent of both the
//! audit store and any host application settings.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::policy::{OperationKind, PermissionLevel};

/// The persisted override map: absent kinds fall back to compiled defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyOverrides {
    #[serde(default)]
    pub overrides: BTreeMap<OperationKind, PermissionLevel>,
}

/// Repository trait for storing and retrieving policy overrides.
pub trait PolicyRepository: Send + Sync {
    fn load(&self) -> Result<PolicyOverrides>;
    fn store(&self, overrides: &PolicyOverrides) -> Result<()>;
}

/// File-backed policy repository.
pub struct FilePolicyRepository {
    path: PathBuf,
}

impl FilePolicyRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Repository at the conventional `permissions.json` under a base dir.
    pub fn with_base_dir<P: AsRef<Path>>(base: P) -> Self {
        Self::new(base.as_ref().join("permissions.json"))
    }
}

impl PolicyRepository for FilePolicyRepository {
    fn load(&self) -> Result<PolicyOverrides> {
        Ok(warden_common::load_json_or_default(&self.path)?)
    }

    fn store(&self, overrides: &PolicyOverrides) -> Result<()> {
        warden_common::save_json(&self.path, overrides)?;
        Ok(())
    }
}

/// In-memory policy repository (for tests).
#[derive(Default)]
pub struct InMemoryPolicyRepository {
    overrides: Arc<RwLock<PolicyOverrides>>,
}

impl InMemoryPolicyRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PolicyRepository for InMemoryPolicyRepository {
    fn load(&self) -> Result<PolicyOverrides> {
        Ok(self.overrides.read().clone())
    }

    fn store(&self, overrides: &PolicyOverrides) -> Result<()> {
        *self.overrides.write() = overrides.clone();
        Ok(())
    }
}
