//! Property-based tests for the audit log
//!
//! Capacity itself is covered by the integration tests; these properties
//! stick to cheap invariants over small logs.

use std::sync::Arc;

use proptest::prelude::*;
use warden_audit::{AuditEntry, AuditLog, InMemoryAuditRepository};

fn memory_log() -> AuditLog {
    AuditLog::new(Arc::new(InMemoryAuditRepository::new()))
}

proptest! {
    #[test]
    fn prop_query_never_exceeds_limit(count in 0usize..40, limit in 0usize..60) {
        let log = memory_log();
        for i in 0..count {
            log.append(AuditEntry::new("file:read", format!("/f{i}"), true)).unwrap();
        }
        let entries = log.query(limit);
        prop_assert!(entries.len() <= limit);
        prop_assert_eq!(entries.len(), count.min(limit));
    }

    #[test]
    fn prop_query_is_reverse_chronological(count in 2usize..40) {
        let log = memory_log();
        for i in 0..count {
            log.append(AuditEntry::new("file:read", format!("/f{i}"), true)).unwrap();
        }
        let entries = log.query(count);
        for window in entries.windows(2) {
            prop_assert!(window[0].timestamp >= window[1].timestamp);
        }
    }

    #[test]
    fn prop_append_then_query_sees_newest_first(targets in prop::collection::vec("[a-z]{1,8}", 1..20)) {
        let log = memory_log();
        for target in &targets {
            log.append(AuditEntry::new("shell:execute", target.clone(), true)).unwrap();
        }

        let entries = log.query(targets.len());
        let mut expected: Vec<_> = targets.clone();
        expected.reverse();
        let observed: Vec<_> = entries.iter().map(|e| e.target.clone()).collect();
        prop_assert_eq!(observed, expected);
    }

    #[test]
    fn prop_clear_always_empties(count in 0usize..20) {
        let log = memory_log();
        for i in 0..count {
            log.append(AuditEntry::new("file:read", format!("/f{i}"), true)).unwrap();
        }
        log.clear().unwrap();
        prop_assert!(log.is_empty());
        prop_assert!(log.query(10).is_empty());
    }
}
