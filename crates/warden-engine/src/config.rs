//! Process-wide engine configuration
//!
//! Runtime-only state: the persisted surfaces are the policy overrides and
//! the audit log, never this struct. Updates arrive as partial merges from
//! the host's settings layer.

use serde::{Deserialize, Serialize};

/// Engine configuration consumed by the resolver and the request flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Gates Ask-level auto-grant: when false, Ask always resolves to
    /// granted without consulting any confirmation handler.
    pub enable_permission_confirm: bool,
    /// When false, no audit entries are written.
    pub enable_audit_log: bool,
    /// When false, workspace-boundary checks are skipped entirely
    /// (sensitive-path checks still apply).
    pub strict_workspace_mode: bool,
    /// Replacement shell whitelist; `None` keeps the compiled defaults.
    pub allowed_shell_commands: Option<Vec<String>>,
    /// UI passthrough only; the engine never acts on it.
    pub show_security_warnings: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enable_permission_confirm: true,
            enable_audit_log: true,
            strict_workspace_mode: true,
            allowed_shell_commands: None,
            show_security_warnings: true,
        }
    }
}

/// Partial configuration update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigUpdate {
    pub enable_permission_confirm: Option<bool>,
    pub enable_audit_log: Option<bool>,
    pub strict_workspace_mode: Option<bool>,
    pub allowed_shell_commands: Option<Vec<String>>,
    pub show_security_warnings: Option<bool>,
}

impl EngineConfig {
    /// Merge a partial update into this configuration.
    pub fn apply(&mut self, update: ConfigUpdate) {
        if let Some(v) = update.enable_permission_confirm {
            self.enable_permission_confirm = v;
        }
        if let Some(v) = update.enable_audit_log {
            self.enable_audit_log = v;
        }
        if let Some(v) = update.strict_workspace_mode {
            self.strict_workspace_mode = v;
        }
        if let Some(v) = update.allowed_shell_commands {
            self.allowed_shell_commands = Some(v);
        }
        if let Some(v) = update.show_security_warnings {
            self.show_security_warnings = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(config.enable_permission_confirm);
        assert!(config.enable_audit_log);
        assert!(config.strict_workspace_mode);
        assert!(config.allowed_shell_commands.is_none());
        assert!(config.show_security_warnings);
    }

    #[test]
    fn test_partial_update_touches_only_set_fields() {
        let mut config = EngineConfig::default();
        config.apply(ConfigUpdate {
            enable_audit_log: Some(false),
            ..Default::default()
        });

        assert!(!config.enable_audit_log);
        assert!(config.enable_permission_confirm);
        assert!(config.strict_workspace_mode);
    }

    #[test]
    fn test_update_replaces_shell_whitelist() {
        let mut config = EngineConfig::default();
        config.apply(ConfigUpdate {
            allowed_shell_commands: Some(vec!["ls".to_string(), "cat".to_string()]),
            ..Default::default()
        });

        assert_eq!(
            config.allowed_shell_commands,
            Some(vec!["ls".to_string(), "cat".to_string()])
        );
    }

    #[test]
    fn test_update_deserializes_from_partial_json() {
        let update: ConfigUpdate =
            serde_json::from_str(r#"{"strict_workspace_mode": false}"#).unwrap();
        assert_eq!(update.strict_workspace_mode, Some(false));
        assert!(update.enable_audit_log.is_none());
    }
}
