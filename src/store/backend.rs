//! Primary report-store contract and in-memory backends.

use crate::report::Report;
use crate::scenario::Fingerprint;
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Instant;

/// Primary report cache, keyed by fingerprint.
///
/// Entries are owned by the backend: a `get` hit updates the entry's
/// access bookkeeping, a `put` is insert-or-replace with no partial
/// updates, and invalidation is all-or-nothing via `delete_all`.
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn get(&self, fingerprint: &Fingerprint) -> Result<Option<Report>>;
    async fn put(&self, fingerprint: &Fingerprint, report: &Report) -> Result<()>;
    /// Bulk invalidation; returns the number of deleted entries.
    async fn delete_all(&self) -> Result<u64>;
    async fn len(&self) -> Result<usize>;
    fn name(&self) -> &'static str;
}

struct StoredEntry {
    report: Report,
    hit_count: u64,
    last_accessed: Option<Instant>,
}

impl StoredEntry {
    fn new(report: Report) -> Self {
        Self {
            report,
            hit_count: 0,
            last_accessed: None,
        }
    }
}

/// In-memory primary store with per-entry hit count and last-access
/// bookkeeping.
#[derive(Default)]
pub struct MemoryReportStore {
    entries: RwLock<HashMap<Fingerprint, StoredEntry>>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hit count for one entry, if present. Exposed for stats surfaces
    /// and tests.
    pub fn access_count(&self, fingerprint: &Fingerprint) -> Option<u64> {
        self.entries
            .read()
            .unwrap()
            .get(fingerprint)
            .map(|e| e.hit_count)
    }
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn get(&self, fingerprint: &Fingerprint) -> Result<Option<Report>> {
        let mut entries = self.entries.write().unwrap();
        if let Some(entry) = entries.get_mut(fingerprint) {
            entry.hit_count += 1;
            entry.last_accessed = Some(Instant::now());
            return Ok(Some(entry.report.clone()));
        }
        Ok(None)
    }

    async fn put(&self, fingerprint: &Fingerprint, report: &Report) -> Result<()> {
        self.entries
            .write()
            .unwrap()
            .insert(fingerprint.clone(), StoredEntry::new(report.clone()));
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64> {
        let mut entries = self.entries.write().unwrap();
        let count = entries.len() as u64;
        entries.clear();
        Ok(count)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.entries.read().unwrap().len())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// No-op primary store: every lookup misses, writes are discarded.
pub struct NullReportStore;

impl NullReportStore {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NullReportStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReportStore for NullReportStore {
    async fn get(&self, _: &Fingerprint) -> Result<Option<Report>> {
        Ok(None)
    }

    async fn put(&self, _: &Fingerprint, _: &Report) -> Result<()> {
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64> {
        Ok(0)
    }

    async fn len(&self) -> Result<usize> {
        Ok(0)
    }

    fn name(&self) -> &'static str {
        "null"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{CommonSections, ReportMeta};
    use crate::scenario::{Language, Scenario};
    use crate::sources::SourceRegistry;

    fn fingerprint() -> Fingerprint {
        Scenario::new("Benchmarking", vec!["Crossref".into()], Language::Es)
            .normalize(SourceRegistry::builtin())
            .unwrap()
            .fingerprint()
    }

    fn report() -> Report {
        Report::single_source(CommonSections::default(), ReportMeta::new("test-model"))
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = MemoryReportStore::new();
        let fp = fingerprint();
        assert!(store.get(&fp).await.unwrap().is_none());

        let report = report();
        store.put(&fp, &report).await.unwrap();
        assert_eq!(store.get(&fp).await.unwrap(), Some(report));
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn hits_are_counted() {
        let store = MemoryReportStore::new();
        let fp = fingerprint();
        store.put(&fp, &report()).await.unwrap();
        assert_eq!(store.access_count(&fp), Some(0));

        store.get(&fp).await.unwrap();
        store.get(&fp).await.unwrap();
        assert_eq!(store.access_count(&fp), Some(2));
    }

    #[tokio::test]
    async fn put_replaces_existing_entry() {
        let store = MemoryReportStore::new();
        let fp = fingerprint();
        store.put(&fp, &report()).await.unwrap();

        let mut updated = report();
        updated.sections.executive_summary = "replaced".to_string();
        store.put(&fp, &updated).await.unwrap();

        assert_eq!(store.len().await.unwrap(), 1);
        let got = store.get(&fp).await.unwrap().unwrap();
        assert_eq!(got.sections.executive_summary, "replaced");
    }

    #[tokio::test]
    async fn delete_all_reports_count_and_empties() {
        let store = MemoryReportStore::new();
        let fp = fingerprint();
        store.put(&fp, &report()).await.unwrap();
        assert_eq!(store.delete_all().await.unwrap(), 1);
        assert!(store.get(&fp).await.unwrap().is_none());
        assert_eq!(store.delete_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn null_store_never_hits() {
        let store = NullReportStore::new();
        let fp = fingerprint();
        store.put(&fp, &report()).await.unwrap();
        assert!(store.get(&fp).await.unwrap().is_none());
        assert_eq!(store.len().await.unwrap(), 0);
    }
}
