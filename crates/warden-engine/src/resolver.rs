//! The permission resolver: policy lookup, session cache, audit
//!
//! A lookup-and-log, not a multi-step state machine: the only cross-cutting
//! piece is the session decision cache, which memoizes granted decisions for
//! the process lifetime so identical repeated requests resolve silently
//! (no re-evaluation, no duplicate audit entries).

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use warden_audit::{AuditEntry, AuditLog};

use crate::config::EngineConfig;
use crate::policy::{OperationKind, PermissionLevel, PolicyStore};

/// Synchronous confirmation seam for the Ask level.
///
/// The engine itself never blocks on user interaction; a host that wants
/// real prompting installs a handler whose `confirm` is expected to return
/// promptly with an already-collected decision.
pub trait ConfirmationHandler: Send + Sync {
    fn confirm(&self, kind: OperationKind, target: &str) -> bool;
}

/// Outcome of a resolver decision, with the audit detail that was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOutcome {
    pub granted: bool,
    pub detail: String,
}

/// Combines policy lookups with the session decision cache and writes every
/// fresh decision to the audit log.
pub struct PermissionResolver {
    policy: Arc<PolicyStore>,
    audit: AuditLog,
    config: Arc<RwLock<EngineConfig>>,
    cache: RwLock<HashMap<(OperationKind, String), bool>>,
    confirmation: Option<Arc<dyn ConfirmationHandler>>,
}

impl PermissionResolver {
    pub fn new(
        policy: Arc<PolicyStore>,
        audit: AuditLog,
        config: Arc<RwLock<EngineConfig>>,
    ) -> Self {
        Self {
            policy,
            audit,
            config,
            cache: RwLock::new(HashMap::new()),
            confirmation: None,
        }
    }

    /// Install the Ask-level confirmation handler.
    pub fn with_confirmation(mut self, handler: Arc<dyn ConfirmationHandler>) -> Self {
        self.confirmation = Some(handler);
        self
    }

    /// Decide whether `kind` on `target` is currently permitted.
    pub fn check_permission(&self, kind: OperationKind, target: &str) -> bool {
        self.resolve(kind, target).granted
    }

    /// Full decision with recorded detail.
    pub fn resolve(&self, kind: OperationKind, target: &str) -> ResolverOutcome {
        let key = (kind, target.to_string());
        if let Some(&cached) = self.cache.read().get(&key) {
            // Repeats are silent: no re-evaluation, no new audit entry.
            return ResolverOutcome {
                granted: cached,
                detail: "session cache".to_string(),
            };
        }

        let level = self.policy.level_for(kind);
        let outcome = match level {
            PermissionLevel::Denied => ResolverOutcome {
                granted: false,
                detail: "denied by policy".to_string(),
            },
            PermissionLevel::Ask => self.resolve_ask(kind, target),
            PermissionLevel::Allowed => ResolverOutcome {
                granted: true,
                detail: "allowed by policy".to_string(),
            },
        };

        debug!(kind = %kind, target = target, granted = outcome.granted, detail = %outcome.detail, "Permission resolved");
        self.record(kind, target, outcome.granted, &outcome.detail);

        // Only grants are memoized; denials re-evaluate (and re-log) so a
        // later policy relaxation takes effect immediately.
        if outcome.granted {
            self.cache.write().insert(key, true);
        }
        outcome
    }

    /// Ask resolution, fail-open by design: this engine never blocks on a
    /// user. With confirmation enabled and a handler installed the handler
    /// decides; otherwise the request is granted and the audit detail says
    /// which case applied.
    fn resolve_ask(&self, kind: OperationKind, target: &str) -> ResolverOutcome {
        let confirm_enabled = self.config.read().enable_permission_confirm;

        if !confirm_enabled {
            return ResolverOutcome {
                granted: true,
                detail: "ask level: confirmation disabled, granted".to_string(),
            };
        }

        match &self.confirmation {
            Some(handler) => {
                if handler.confirm(kind, target) {
                    ResolverOutcome {
                        granted: true,
                        detail: "ask level: confirmed by handler".to_string(),
                    }
                } else {
                    ResolverOutcome {
                        granted: false,
                        detail: "ask level: declined by handler".to_string(),
                    }
                }
            }
            None => ResolverOutcome {
                granted: true,
                detail: "ask level: confirmation delegated to caller, granted".to_string(),
            },
        }
    }

    /// Drop cached decisions for a kind; called when its policy changes.
    pub fn invalidate_kind(&self, kind: OperationKind) {
        self.cache.write().retain(|(k, _), _| *k != kind);
    }

    fn record(&self, kind: OperationKind, target: &str, success: bool, detail: &str) {
        if !self.config.read().enable_audit_log {
            return;
        }
        let entry = AuditEntry::new(kind.as_str(), target, success).with_detail(detail);
        if let Err(e) = self.audit.append(entry) {
            warn!(error = %e, "Failed to write audit entry");
        }
    }
}
