//! Permission policy engine for agent actions
//!
//! The stateful half of warden: a persisted policy store mapping operation
//! kinds to permission levels, a session-scoped decision cache, the
//! permission resolver, and the [`SecurityEngine`] request-flow façade that
//! file, shell and git collaborators call before performing any gated
//! action.
//!
//! The engine is an explicit object with injected persistence and audit
//! dependencies; one process can host several independent engines, one per
//! workspace.

pub mod config;
pub mod engine;
pub mod error;
pub mod policy;
pub mod resolver;
pub mod storage;

pub use config::{ConfigUpdate, EngineConfig};
pub use engine::{ActionRequest, Decision, SecurityEngine, StaticRoots, WorkspaceRootsProvider};
pub use error::{Error, Result};
pub use policy::{OperationKind, PermissionLevel, PolicyStore};
pub use resolver::{ConfirmationHandler, PermissionResolver, ResolverOutcome};
pub use storage::{
    FilePolicyRepository, InMemoryPolicyRepository, PolicyOverrides, PolicyRepository,
};
