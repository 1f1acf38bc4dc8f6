//! Sensitive-path detection and workspace-boundary validation
//!
//! Paths are classified on their separator-normalized, lowercased form so
//! `C:\Windows\System32` and `c:/windows/system32` are the same location.
//! Boundary validation canonicalizes first (following `..` and symlinks), so
//! a traversal like `project/../secrets.txt` is judged by where it actually
//! lands, not by its spelling.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::patterns::{
    SENSITIVE_COMPONENTS, SENSITIVE_KEY_PREFIXES, SENSITIVE_NAME_FRAGMENTS, SENSITIVE_ROOTS,
};

/// Normalize a path string for rule matching: forward slashes, lowercase.
fn normalize_for_match(path: &str) -> String {
    path.replace('\\', "/").to_lowercase()
}

/// Strip a `c:`-style drive prefix so the OS-root rules apply to Windows
/// paths as well.
fn strip_drive_prefix(normalized: &str) -> &str {
    let bytes = normalized.as_bytes();
    if bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic() {
        &normalized[2..]
    } else {
        normalized
    }
}

fn under_root(path: &str, root: &str) -> bool {
    path == root || path.starts_with(&format!("{root}/"))
}

/// Classify a path as sensitive: OS-protected directories, credential
/// storage directories, private keys, and files whose name suggests secret
/// material.
///
/// Input that cannot be interpreted as text is treated as sensitive.
pub fn is_sensitive_path(path: &Path) -> bool {
    let Some(raw) = path.to_str() else {
        debug!(path = ?path, "Non-text path treated as sensitive");
        return true;
    };
    is_sensitive_str(raw)
}

fn is_sensitive_str(raw: &str) -> bool {
    let normalized = normalize_for_match(raw);
    let rootless = strip_drive_prefix(&normalized);

    for root in SENSITIVE_ROOTS {
        if under_root(rootless, root) {
            return true;
        }
    }

    for component in normalized.split('/') {
        if SENSITIVE_COMPONENTS.contains(&component) {
            return true;
        }
        if component == ".env" || component.starts_with(".env.") {
            return true;
        }
        if SENSITIVE_KEY_PREFIXES
            .iter()
            .any(|prefix| component == *prefix || component.starts_with(&format!("{prefix}.")))
        {
            return true;
        }
    }

    if let Some(name) = normalized.rsplit('/').next() {
        if SENSITIVE_NAME_FRAGMENTS
            .iter()
            .any(|fragment| name.contains(fragment))
        {
            return true;
        }
    }

    false
}

/// Lexically normalize an absolute path: drop `.`, resolve `..` against the
/// preceding component. Fails (returns `None`) if `..` would climb past the
/// root.
fn lexical_normalize(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(p) => out.push(p.as_os_str()),
            Component::RootDir => out.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    return None;
                }
            }
            Component::Normal(c) => out.push(c),
        }
    }
    if out.as_os_str().is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Resolve a path to its canonical absolute form.
///
/// Follows symlinks when the target exists; for not-yet-existing targets
/// (e.g. a file about to be written) the deepest existing ancestor is
/// canonicalized and the remaining components are appended after lexical
/// `..` resolution. Relative paths and paths that climb past the root
/// resolve to `None` — callers treat that as a denial.
pub fn resolve_path(path: &Path) -> Option<PathBuf> {
    if !path.is_absolute() {
        return None;
    }
    let lexical = lexical_normalize(path)?;

    if let Ok(canonical) = lexical.canonicalize() {
        return Some(canonical);
    }

    // Walk up to the deepest ancestor that exists, canonicalize it, then
    // re-append the components below it.
    let mut pending: Vec<std::ffi::OsString> = Vec::new();
    let mut current = lexical.as_path();
    loop {
        if current.exists() {
            let mut resolved = current.canonicalize().ok()?;
            for component in pending.iter().rev() {
                resolved.push(component);
            }
            return Some(resolved);
        }
        pending.push(current.file_name()?.to_os_string());
        current = current.parent()?;
    }
}

/// Validate that `path` resolves inside one of the workspace `roots` and is
/// not sensitive.
///
/// Both conditions must hold. An empty root set denies unconditionally: no
/// configured boundary means no action is permitted.
pub fn validate_workspace_boundary(path: &Path, roots: &[PathBuf]) -> bool {
    if roots.is_empty() {
        debug!(path = %path.display(), "No workspace roots configured, denying");
        return false;
    }

    let Some(resolved) = resolve_path(path) else {
        debug!(path = %path.display(), "Unresolvable path, denying");
        return false;
    };

    if is_sensitive_path(&resolved) {
        debug!(path = %resolved.display(), "Resolved path is sensitive, denying");
        return false;
    }

    roots.iter().any(|root| {
        let root = resolve_path(root).unwrap_or_else(|| root.clone());
        resolved == root || resolved.starts_with(&root)
    })
}
