//! Shell and git command classification
//!
//! Two independent checks run over every shell command line: the base
//! command token against the whitelist, and the full line against the
//! dangerous-pattern table. A dangerous match denies even a whitelisted
//! command. Git lines are cheaper: only the subcommand token is inspected.

use std::collections::BTreeSet;
use std::path::Path;

use glob::Pattern;
use tracing::debug;

use crate::patterns::{DANGEROUS_PATTERNS, DEFAULT_GIT_SUBCOMMANDS, DEFAULT_SHELL_COMMANDS};

/// Outcome of classifying a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandVerdict {
    /// Whether the command may proceed to the permission resolver.
    pub allowed: bool,
    /// Specific denial reason, `None` when allowed.
    pub reason: Option<String>,
}

impl CommandVerdict {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}

/// Classifier holding the (possibly user-overridden) shell whitelist and the
/// git subcommand whitelist.
#[derive(Debug, Clone)]
pub struct CommandClassifier {
    shell_allow: BTreeSet<String>,
    git_allow: BTreeSet<String>,
}

impl Default for CommandClassifier {
    fn default() -> Self {
        Self {
            shell_allow: DEFAULT_SHELL_COMMANDS
                .iter()
                .map(|c| (*c).to_string())
                .collect(),
            git_allow: DEFAULT_GIT_SUBCOMMANDS
                .iter()
                .map(|c| (*c).to_string())
                .collect(),
        }
    }
}

impl CommandClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the shell whitelist with a user-supplied set. Entries may be
    /// literal command names or glob patterns (`"npm*"`).
    pub fn with_shell_whitelist<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            shell_allow: commands.into_iter().map(|c| c.into().to_lowercase()).collect(),
            ..Self::default()
        }
    }

    /// Classify a full shell command line.
    ///
    /// Order is fixed: dangerous patterns first, whitelist second, so the
    /// denial reason always names the strongest objection.
    pub fn classify_shell(&self, command_line: &str) -> CommandVerdict {
        let trimmed = command_line.trim();
        if trimmed.is_empty() {
            return CommandVerdict::deny("empty command line");
        }

        for pattern in DANGEROUS_PATTERNS.iter() {
            if pattern.regex.is_match(trimmed) {
                debug!(command = trimmed, label = pattern.label, "Dangerous pattern match");
                return CommandVerdict::deny(format!("dangerous pattern: {}", pattern.label));
            }
        }

        let Some(base) = Self::base_token(trimmed) else {
            return CommandVerdict::deny("unparseable command line");
        };

        if self.is_allowed_base(&base) {
            CommandVerdict::allow()
        } else {
            CommandVerdict::deny(format!("command not in whitelist: {base}"))
        }
    }

    /// Classify a git invocation by its subcommand (`args[0]`).
    ///
    /// Known limitation: trailing flags are not inspected, so
    /// `push --force` passes whenever `push` does.
    pub fn classify_git<S: AsRef<str>>(&self, args: &[S]) -> CommandVerdict {
        let Some(subcommand) = args.first() else {
            return CommandVerdict::deny("empty git invocation");
        };
        let subcommand = subcommand.as_ref().to_lowercase();

        if self.git_allow.contains(&subcommand) {
            CommandVerdict::allow()
        } else {
            CommandVerdict::deny(format!("git subcommand not permitted: {subcommand}"))
        }
    }

    /// Extract the base command: first whitespace token, path and `.exe`
    /// suffix stripped, lowercased.
    fn base_token(command_line: &str) -> Option<String> {
        let first = command_line.split_whitespace().next()?;
        let name = Path::new(first)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(first);
        let name = name.strip_suffix(".exe").unwrap_or(name);
        if name.is_empty() {
            None
        } else {
            Some(name.to_lowercase())
        }
    }

    fn is_allowed_base(&self, base: &str) -> bool {
        if self.shell_allow.contains(base) {
            return true;
        }
        self.shell_allow
            .iter()
            .filter(|entry| entry.contains(|c| matches!(c, '*' | '?' | '[')))
            .any(|entry| Pattern::new(entry).map(|p| p.matches(base)).unwrap_or(false))
    }
}
