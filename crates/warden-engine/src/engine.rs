//! The security engine façade and request flow
//!
//! Collaborators (file handlers, shell handlers, git handlers) submit an
//! [`ActionRequest`] and receive a [`Decision`]. The evaluation order is
//! fixed for every call site: workspace boundary, then path sensitivity,
//! then dangerous patterns, then whitelist, and only then the policy
//! resolver. Guard denials short-circuit before the resolver and are logged
//! with their specific reason.
//!
//! The engine only authorizes; it never performs the operation. After a
//! grant the caller executes and reports the real outcome back through
//! [`SecurityEngine::log_operation`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use warden_audit::{AuditEntry, AuditLog, AuditRepository, FileAuditRepository};
use warden_guard::{
    is_sensitive_path, resolve_path, validate_workspace_boundary, CommandClassifier,
    CommandVerdict,
};

use crate::config::{ConfigUpdate, EngineConfig};
use crate::error::Result;
use crate::policy::{OperationKind, PermissionLevel, PolicyStore};
use crate::resolver::{ConfirmationHandler, PermissionResolver};
use crate::storage::{FilePolicyRepository, PolicyRepository};

/// Supplies the current workspace boundary roots.
pub trait WorkspaceRootsProvider: Send + Sync {
    fn roots(&self) -> Vec<PathBuf>;
}

/// Fixed root set, for hosts whose workspace never changes mid-session.
pub struct StaticRoots(pub Vec<PathBuf>);

impl WorkspaceRootsProvider for StaticRoots {
    fn roots(&self) -> Vec<PathBuf> {
        self.0.clone()
    }
}

/// One gated action to authorize: an operation kind plus its target (a path
/// for file kinds, a command line for shell/git kinds).
#[derive(Debug, Clone)]
pub struct ActionRequest {
    pub kind: OperationKind,
    pub target: String,
    /// Working directory used to resolve relative file targets.
    pub cwd: Option<PathBuf>,
}

impl ActionRequest {
    pub fn new(kind: OperationKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
            cwd: None,
        }
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

/// Authorization result surfaced to the collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub granted: bool,
    /// Specific denial reason for the UI; `None` when granted.
    pub reason: Option<String>,
}

impl Decision {
    pub fn granted() -> Self {
        Self {
            granted: true,
            reason: None,
        }
    }

    pub fn denied(reason: impl Into<String>) -> Self {
        Self {
            granted: false,
            reason: Some(reason.into()),
        }
    }
}

/// The engine object: injected policy persistence, audit log, and workspace
/// root provider. Construct one per workspace.
pub struct SecurityEngine {
    policy: Arc<PolicyStore>,
    resolver: PermissionResolver,
    audit: AuditLog,
    config: Arc<RwLock<EngineConfig>>,
    classifier: RwLock<CommandClassifier>,
    roots: Arc<dyn WorkspaceRootsProvider>,
}

impl SecurityEngine {
    /// Build an engine over explicit repositories.
    pub fn new(
        policy_repository: Arc<dyn PolicyRepository>,
        audit_repository: Arc<dyn AuditRepository>,
        roots: Arc<dyn WorkspaceRootsProvider>,
    ) -> Self {
        let policy = Arc::new(PolicyStore::new(policy_repository));
        let audit = AuditLog::new(audit_repository);
        let config = Arc::new(RwLock::new(EngineConfig::default()));
        let resolver = PermissionResolver::new(policy.clone(), audit.clone(), config.clone());

        Self {
            policy,
            resolver,
            audit,
            config,
            classifier: RwLock::new(CommandClassifier::new()),
            roots,
        }
    }

    /// Build an engine with file-backed stores under `base_dir`
    /// (`permissions.json` and `audit_log.json`).
    pub fn with_base_dir<P: AsRef<Path>>(base_dir: P, roots: Arc<dyn WorkspaceRootsProvider>) -> Self {
        Self::new(
            Arc::new(FilePolicyRepository::with_base_dir(base_dir.as_ref())),
            Arc::new(FileAuditRepository::with_base_dir(base_dir.as_ref())),
            roots,
        )
    }

    /// Install the Ask-level confirmation handler. Call before first use;
    /// the session cache starts fresh.
    pub fn with_confirmation(mut self, handler: Arc<dyn ConfirmationHandler>) -> Self {
        self.resolver =
            PermissionResolver::new(self.policy.clone(), self.audit.clone(), self.config.clone())
                .with_confirmation(handler);
        self
    }

    /// Authorize one gated action through the fixed pipeline.
    ///
    /// Never panics and never returns an error: any internal failure during
    /// classification converts to a denial carrying the failure text.
    pub fn authorize(&self, request: &ActionRequest) -> Decision {
        match request.kind {
            OperationKind::FileRead
            | OperationKind::FileWrite
            | OperationKind::FileDelete
            | OperationKind::FileRename => self.authorize_file(request),
            OperationKind::ShellExecute | OperationKind::SystemShell => {
                self.authorize_shell(request)
            }
            OperationKind::GitExec => self.authorize_git(request),
            // Interactive sessions carry no single command line to classify.
            OperationKind::TerminalInteractive => self.resolve(request.kind, &request.target),
        }
    }

    fn authorize_file(&self, request: &ActionRequest) -> Decision {
        let raw = Path::new(&request.target);
        let absolute = if raw.is_absolute() {
            raw.to_path_buf()
        } else if let Some(cwd) = &request.cwd {
            cwd.join(raw)
        } else {
            return self.deny_logged(request, "relative path without a working directory");
        };

        let strict = self.config.read().strict_workspace_mode;
        let resolved = resolve_path(&absolute).unwrap_or_else(|| absolute.clone());

        if strict {
            let roots = self.roots.roots();
            if !validate_workspace_boundary(&absolute, &roots) {
                let reason = if roots.is_empty() {
                    "no workspace roots configured".to_string()
                } else if is_sensitive_path(&resolved) {
                    format!("sensitive path: {}", resolved.display())
                } else {
                    format!("outside workspace boundary: {}", resolved.display())
                };
                return self.deny_logged(request, &reason);
            }
        } else if is_sensitive_path(&resolved) {
            // Sensitivity is absolute even with boundary enforcement off.
            return self.deny_logged(request, &format!("sensitive path: {}", resolved.display()));
        }

        self.resolve(request.kind, &resolved.to_string_lossy())
    }

    fn authorize_shell(&self, request: &ActionRequest) -> Decision {
        let verdict = self.classifier.read().classify_shell(&request.target);
        if !verdict.allowed {
            let reason = verdict
                .reason
                .unwrap_or_else(|| "command denied".to_string());
            return self.deny_logged(request, &reason);
        }
        self.resolve(request.kind, &request.target)
    }

    fn authorize_git(&self, request: &ActionRequest) -> Decision {
        let mut args: Vec<&str> = request.target.split_whitespace().collect();
        if args.first() == Some(&"git") {
            args.remove(0);
        }

        let verdict = self.classifier.read().classify_git(&args);
        if !verdict.allowed {
            let reason = verdict
                .reason
                .unwrap_or_else(|| "git command denied".to_string());
            return self.deny_logged(request, &reason);
        }
        self.resolve(request.kind, &request.target)
    }

    fn resolve(&self, kind: OperationKind, target: &str) -> Decision {
        let outcome = self.resolver.resolve(kind, target);
        if outcome.granted {
            Decision::granted()
        } else {
            Decision::denied(outcome.detail)
        }
    }

    /// Log a guard-level denial and build the decision. Short-circuit
    /// denials are never cached, so every attempt is recorded.
    fn deny_logged(&self, request: &ActionRequest, reason: &str) -> Decision {
        debug!(kind = %request.kind, target = %request.target, reason, "Request denied before policy lookup");
        self.record(request.kind, &request.target, false, Some(reason));
        Decision::denied(reason)
    }

    // Collaborator surface -------------------------------------------------

    /// Bare policy check without guard classification.
    pub fn check_permission(&self, kind: OperationKind, target: &str) -> bool {
        self.resolver.check_permission(kind, target)
    }

    /// Persist a policy override and drop stale cached decisions for the
    /// kind so the new level applies immediately.
    pub fn set_permission(&self, kind: OperationKind, level: PermissionLevel) -> Result<()> {
        self.policy.set_level(kind, level)?;
        self.resolver.invalidate_kind(kind);
        Ok(())
    }

    /// Record an executed operation's real outcome (size, exit code, error
    /// text) as a follow-up audit entry.
    pub fn log_operation(
        &self,
        kind: OperationKind,
        target: &str,
        success: bool,
        detail: Option<&str>,
    ) {
        self.record(kind, target, success, detail);
    }

    /// Boundary validation against the current workspace roots.
    pub fn validate_workspace_path(&self, path: &Path) -> bool {
        validate_workspace_boundary(path, &self.roots.roots())
    }

    pub fn is_sensitive_path(&self, path: &Path) -> bool {
        is_sensitive_path(path)
    }

    /// Classify a shell command line against the current whitelist and the
    /// dangerous-pattern table.
    pub fn is_allowed_command(&self, command_line: &str) -> CommandVerdict {
        self.classifier.read().classify_shell(command_line)
    }

    /// Up to `limit` most recent audit entries, most recent first.
    pub fn get_audit_logs(&self, limit: usize) -> Vec<AuditEntry> {
        self.audit.query(limit)
    }

    pub fn clear_audit_logs(&self) -> Result<()> {
        Ok(self.audit.clear()?)
    }

    /// Merge a partial configuration update; a new shell whitelist takes
    /// effect on the next classification.
    pub fn update_config(&self, update: ConfigUpdate) {
        let mut config = self.config.write();
        config.apply(update);

        let classifier = match &config.allowed_shell_commands {
            Some(commands) => CommandClassifier::with_shell_whitelist(commands.iter().cloned()),
            None => CommandClassifier::new(),
        };
        *self.classifier.write() = classifier;
    }

    /// Current configuration snapshot.
    pub fn config(&self) -> EngineConfig {
        self.config.read().clone()
    }

    fn record(&self, kind: OperationKind, target: &str, success: bool, detail: Option<&str>) {
        if !self.config.read().enable_audit_log {
            return;
        }
        let mut entry = AuditEntry::new(kind.as_str(), target, success);
        if let Some(detail) = detail {
            entry = entry.with_detail(detail);
        }
        if let Err(e) = self.audit.append(entry) {
            warn!(error = %e, "Failed to write audit entry");
        }
    }
}
