//! The capped audit log

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use crate::error::Result;
use crate::models::AuditEntry;
use crate::storage::AuditRepository;

/// Maximum number of retained entries; the oldest is evicted past this.
pub const MAX_ENTRIES: usize = 1000;

/// Append-only, capped, persisted decision log.
///
/// Newest entries sit at the front. One mutex owns both the ring and the
/// persistence write, so append/truncate/store is a single atomic step with
/// respect to other writers.
#[derive(Clone)]
pub struct AuditLog {
    inner: Arc<Mutex<VecDeque<AuditEntry>>>,
    repository: Arc<dyn AuditRepository>,
}

impl AuditLog {
    /// Create a log over a repository, loading any persisted entries.
    /// Entries beyond capacity are dropped oldest-first on load.
    pub fn new(repository: Arc<dyn AuditRepository>) -> Self {
        let mut entries: VecDeque<AuditEntry> = match repository.load() {
            Ok(loaded) => loaded.into(),
            Err(e) => {
                warn!(error = %e, "Failed to load audit log, starting empty");
                VecDeque::new()
            }
        };
        entries.truncate(MAX_ENTRIES);

        Self {
            inner: Arc::new(Mutex::new(entries)),
            repository,
        }
    }

    /// Append an entry, newest-first, evicting past capacity, and persist.
    pub fn append(&self, entry: AuditEntry) -> Result<()> {
        let mut entries = self.inner.lock();
        entries.push_front(entry);
        entries.truncate(MAX_ENTRIES);

        let snapshot: Vec<AuditEntry> = entries.iter().cloned().collect();
        self.repository.store(&snapshot)
    }

    /// Up to `limit` most recent entries, most recent first.
    pub fn query(&self, limit: usize) -> Vec<AuditEntry> {
        self.inner.lock().iter().take(limit).cloned().collect()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Drop all entries, in memory and persisted.
    pub fn clear(&self) -> Result<()> {
        let mut entries = self.inner.lock();
        entries.clear();
        self.repository.store(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileAuditRepository, InMemoryAuditRepository};

    fn memory_log() -> AuditLog {
        AuditLog::new(Arc::new(InMemoryAuditRepository::new()))
    }

    #[test]
    fn test_append_and_query_newest_first() {
        let log = memory_log();
        log.append(AuditEntry::new("file:read", "/a", true)).unwrap();
        log.append(AuditEntry::new("file:write", "/b", true)).unwrap();

        let entries = log.query(10);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].target, "/b");
        assert_eq!(entries[1].target, "/a");
    }

    #[test]
    fn test_query_respects_limit() {
        let log = memory_log();
        for i in 0..5 {
            log.append(AuditEntry::new("file:read", format!("/f{i}"), true))
                .unwrap();
        }
        assert_eq!(log.query(3).len(), 3);
        assert_eq!(log.query(3)[0].target, "/f4");
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let log = memory_log();
        for i in 0..=MAX_ENTRIES {
            log.append(AuditEntry::new("file:read", format!("/f{i}"), true))
                .unwrap();
        }

        assert_eq!(log.len(), MAX_ENTRIES);
        let entries = log.query(MAX_ENTRIES + 10);
        // The first-inserted entry is gone; the newest 1000 remain in
        // reverse-chronological order.
        assert_eq!(entries.len(), MAX_ENTRIES);
        assert_eq!(entries[0].target, format!("/f{MAX_ENTRIES}"));
        assert_eq!(entries[MAX_ENTRIES - 1].target, "/f1");
        assert!(!entries.iter().any(|e| e.target == "/f0"));
    }

    #[test]
    fn test_clear_empties_log() {
        let log = memory_log();
        log.append(AuditEntry::new("file:read", "/a", true)).unwrap();
        log.clear().unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn test_persistence_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Arc::new(FileAuditRepository::with_base_dir(dir.path()));

        {
            let log = AuditLog::new(repo.clone());
            log.append(AuditEntry::new("git:exec", "status", true))
                .unwrap();
        }

        let reloaded = AuditLog::new(repo);
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.query(1)[0].operation, "git:exec");
    }

    #[test]
    fn test_clear_persists() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Arc::new(FileAuditRepository::with_base_dir(dir.path()));

        let log = AuditLog::new(repo.clone());
        log.append(AuditEntry::new("file:read", "/a", true)).unwrap();
        log.clear().unwrap();

        let reloaded = AuditLog::new(repo);
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_concurrent_appends_lose_nothing() {
        let log = memory_log();
        let mut handles = Vec::new();
        for t in 0..8 {
            let log = log.clone();
            handles.push(std::thread::spawn(move || {
                for i in 0..50 {
                    log.append(AuditEntry::new("file:read", format!("/t{t}/f{i}"), true))
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(log.len(), 400);
    }
}
