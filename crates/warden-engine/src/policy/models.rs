//! Operation kinds and permission levels

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The fixed vocabulary of gated agent operations.
///
/// Serialized as the stable wire ids consumed by collaborators
/// (`file:read`, `shell:execute`, ...). Adding a kind requires a compiled-in
/// default in [`OperationKind::default_level`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    #[serde(rename = "file:read")]
    FileRead,
    #[serde(rename = "file:write")]
    FileWrite,
    #[serde(rename = "file:delete")]
    FileDelete,
    #[serde(rename = "file:rename")]
    FileRename,
    #[serde(rename = "shell:execute")]
    ShellExecute,
    #[serde(rename = "terminal:interactive")]
    TerminalInteractive,
    #[serde(rename = "git:exec")]
    GitExec,
    #[serde(rename = "system:shell")]
    SystemShell,
}

impl OperationKind {
    /// Stable wire id for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::FileRead => "file:read",
            OperationKind::FileWrite => "file:write",
            OperationKind::FileDelete => "file:delete",
            OperationKind::FileRename => "file:rename",
            OperationKind::ShellExecute => "shell:execute",
            OperationKind::TerminalInteractive => "terminal:interactive",
            OperationKind::GitExec => "git:exec",
            OperationKind::SystemShell => "system:shell",
        }
    }

    /// Compiled-in default level: deletions prompt, raw system shells are
    /// denied, everything else is allowed.
    pub fn default_level(&self) -> PermissionLevel {
        match self {
            OperationKind::FileDelete => PermissionLevel::Ask,
            OperationKind::SystemShell => PermissionLevel::Denied,
            _ => PermissionLevel::Allowed,
        }
    }

    /// True for the path-targeted kinds.
    pub fn is_file_operation(&self) -> bool {
        matches!(
            self,
            OperationKind::FileRead
                | OperationKind::FileWrite
                | OperationKind::FileDelete
                | OperationKind::FileRename
        )
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OperationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file:read" => Ok(OperationKind::FileRead),
            "file:write" => Ok(OperationKind::FileWrite),
            "file:delete" => Ok(OperationKind::FileDelete),
            "file:rename" => Ok(OperationKind::FileRename),
            "shell:execute" => Ok(OperationKind::ShellExecute),
            "terminal:interactive" => Ok(OperationKind::TerminalInteractive),
            "git:exec" => Ok(OperationKind::GitExec),
            "system:shell" => Ok(OperationKind::SystemShell),
            other => Err(Error::UnknownOperationKind(other.to_string())),
        }
    }
}

/// Three-valued policy state for an operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    /// Proceed without prompting
    Allowed,
    /// Prompt before proceeding
    Ask,
    /// Never proceed
    Denied,
}

impl PermissionLevel {
    /// Precedence when reconciling multiple sources: Denied > Ask > Allowed.
    pub fn is_more_restrictive_than(&self, other: PermissionLevel) -> bool {
        matches!(
            (self, other),
            (PermissionLevel::Denied, PermissionLevel::Ask)
                | (PermissionLevel::Denied, PermissionLevel::Allowed)
                | (PermissionLevel::Ask, PermissionLevel::Allowed)
        )
    }
}

impl std::fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionLevel::Allowed => write!(f, "allowed"),
            PermissionLevel::Ask => write!(f, "ask"),
            PermissionLevel::Denied => write!(f, "denied"),
        }
    }
}
