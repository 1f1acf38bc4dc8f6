//! Path and command classification for the warden security engine
//!
//! Pure, stateless checks that run before any policy lookup: sensitive-path
//! detection, workspace-boundary validation, and shell/git command
//! classification against a whitelist and a dangerous-pattern denylist.
//!
//! Every check fails closed: unresolvable or malformed input is treated as
//! sensitive or denied, never as an error surfaced to the caller. Pattern
//! matching here is heuristic defense-in-depth, not a shell parser; hosts
//! that need hard guarantees must pair it with OS-level sandboxing.

pub mod command;
pub mod path;
pub mod patterns;

pub use command::{CommandClassifier, CommandVerdict};
pub use path::{is_sensitive_path, resolve_path, validate_workspace_boundary};
