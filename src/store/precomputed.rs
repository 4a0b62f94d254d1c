//! Secondary precomputed-findings contract.

use crate::report::Report;
use crate::scenario::{CombinationKey, Language};
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// Read-only fallback store of precomputed findings.
///
/// Addressed by the 3-field combination shape (tool, sources-as-joined-text,
/// language) instead of the primary fingerprint; the resolver derives both
/// keys from the same canonical scenario.
#[async_trait]
pub trait PrecomputedStore: Send + Sync {
    async fn find(
        &self,
        tool_name: &str,
        sources_text: &str,
        language: Language,
    ) -> Result<Option<Report>>;

    fn name(&self) -> &'static str;
}

fn row_key(tool_name: &str, sources_text: &str, language: Language) -> String {
    format!(
        "{}\u{1f}{}\u{1f}{}",
        tool_name.trim().to_lowercase(),
        sources_text.trim().to_lowercase(),
        language.code()
    )
}

/// In-memory secondary store, seedable from a precomputation pipeline or
/// from tests.
#[derive(Default)]
pub struct MemoryPrecomputedStore {
    rows: RwLock<HashMap<String, Report>>,
}

impl MemoryPrecomputedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one precomputed row under a combination key.
    pub fn seed(&self, key: &CombinationKey, report: Report) {
        self.rows.write().unwrap().insert(
            row_key(key.tool_name(), key.sources_text(), key.language()),
            report,
        );
    }

    pub fn len(&self) -> usize {
        self.rows.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PrecomputedStore for MemoryPrecomputedStore {
    async fn find(
        &self,
        tool_name: &str,
        sources_text: &str,
        language: Language,
    ) -> Result<Option<Report>> {
        Ok(self
            .rows
            .read()
            .unwrap()
            .get(&row_key(tool_name, sources_text, language))
            .cloned())
    }

    fn name(&self) -> &'static str {
        "memory-precomputed"
    }
}

/// Empty secondary store for deployments without a precomputation
/// pipeline.
pub struct NullPrecomputedStore;

#[async_trait]
impl PrecomputedStore for NullPrecomputedStore {
    async fn find(&self, _: &str, _: &str, _: Language) -> Result<Option<Report>> {
        Ok(None)
    }

    fn name(&self) -> &'static str {
        "null-precomputed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{CommonSections, ReportMeta};
    use crate::scenario::Scenario;
    use crate::sources::SourceRegistry;

    fn report() -> Report {
        Report::single_source(CommonSections::default(), ReportMeta::new("precomputed"))
    }

    #[tokio::test]
    async fn seeded_row_is_found_by_combination_fields() {
        let store = MemoryPrecomputedStore::new();
        let canonical = Scenario::new("Benchmarking", vec!["Crossref".into()], Language::Es)
            .normalize(SourceRegistry::builtin())
            .unwrap();
        let key = canonical.combination_key();
        let report = report();
        store.seed(&key, report.clone());

        let found = store
            .find(key.tool_name(), key.sources_text(), key.language())
            .await
            .unwrap();
        assert_eq!(found, Some(report));
    }

    #[tokio::test]
    async fn lookup_folds_case() {
        let store = MemoryPrecomputedStore::new();
        let canonical = Scenario::new("Benchmarking", vec!["Crossref".into()], Language::Es)
            .normalize(SourceRegistry::builtin())
            .unwrap();
        store.seed(&canonical.combination_key(), report());

        let found = store
            .find("BENCHMARKING", "crossref", Language::Es)
            .await
            .unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn different_language_misses() {
        let store = MemoryPrecomputedStore::new();
        let canonical = Scenario::new("Benchmarking", vec!["Crossref".into()], Language::Es)
            .normalize(SourceRegistry::builtin())
            .unwrap();
        let key = canonical.combination_key();
        store.seed(&key, report());

        let found = store
            .find(key.tool_name(), key.sources_text(), Language::En)
            .await
            .unwrap();
        assert!(found.is_none());
    }
}
