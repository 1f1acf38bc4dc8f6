//! Audit retention and persistence-format tests

use std::sync::Arc;

use warden_audit::{AuditEntry, AuditLog, FileAuditRepository, MAX_ENTRIES};

#[test]
fn test_capacity_after_one_past_limit() {
    let dir = tempfile::tempdir().unwrap();
    let log = AuditLog::new(Arc::new(FileAuditRepository::with_base_dir(dir.path())));

    for i in 0..=MAX_ENTRIES {
        log.append(AuditEntry::new("file:read", format!("/f/{i}"), true))
            .unwrap();
    }

    let entries = log.query(MAX_ENTRIES + 10);
    assert_eq!(entries.len(), MAX_ENTRIES);
    // The first-inserted entry is evicted; the rest are newest-first.
    assert!(!entries.iter().any(|e| e.target == "/f/0"));
    assert_eq!(entries[0].target, format!("/f/{MAX_ENTRIES}"));
    assert_eq!(entries[MAX_ENTRIES - 1].target, "/f/1");
}

#[test]
fn test_persisted_file_is_a_json_array_of_entries() {
    let dir = tempfile::tempdir().unwrap();
    let log = AuditLog::new(Arc::new(FileAuditRepository::with_base_dir(dir.path())));

    log.append(AuditEntry::new("shell:execute", "cargo test", true).with_detail("exit code 0"))
        .unwrap();
    log.append(AuditEntry::new("file:write", "/w/a.rs", false).with_detail("denied"))
        .unwrap();

    let raw = std::fs::read_to_string(dir.path().join("audit_log.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();

    let array = parsed.as_array().unwrap();
    assert_eq!(array.len(), 2);
    // Newest-first on disk too.
    assert_eq!(array[0]["operation"], "file:write");
    assert_eq!(array[0]["success"], false);
    assert_eq!(array[1]["operation"], "shell:execute");
    assert_eq!(array[1]["detail"], "exit code 0");
}

#[test]
fn test_entries_loadable_with_shared_json_store() {
    let dir = tempfile::tempdir().unwrap();
    let log = AuditLog::new(Arc::new(FileAuditRepository::with_base_dir(dir.path())));
    log.append(AuditEntry::new("git:exec", "status", true))
        .unwrap();

    let loaded: Vec<AuditEntry> =
        warden_common::load_json_or_default(dir.path().join("audit_log.json")).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].operation, "git:exec");
}
