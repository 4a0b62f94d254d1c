//! Scenario normalization: the canonical, order-independent form.

use super::{DateRange, Language, Scenario, ScenarioError};
use crate::sources::SourceRegistry;
use serde::{Deserialize, Serialize};

/// The canonical form of a scenario, suitable for hashing.
///
/// Only [`Scenario::normalize`] constructs this type, which guarantees:
/// - the tool name is trimmed and lowercased (tool matching is
///   case-insensitive by policy),
/// - every source is a canonical registry name,
/// - sources are sorted lexicographically and deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalScenario {
    tool_name: String,
    sources: Vec<String>,
    language: Language,
    date_range: Option<DateRange>,
}

impl Scenario {
    /// Canonicalize this scenario against a mapping table.
    ///
    /// Every raw source entry must resolve; unmappable entries are
    /// collected and surfaced together in [`ScenarioError::UnmappableSource`]
    /// so the caller can see exactly which identifiers were bad.
    pub fn normalize(
        &self,
        registry: &SourceRegistry,
    ) -> Result<CanonicalScenario, ScenarioError> {
        let tool_name = self.tool_name.trim().to_lowercase();
        if tool_name.is_empty() {
            return Err(ScenarioError::EmptyToolName);
        }
        if self.sources.is_empty() {
            return Err(ScenarioError::EmptySources);
        }

        let mut resolved = Vec::with_capacity(self.sources.len());
        let mut unmappable = Vec::new();
        for raw in &self.sources {
            match registry.resolve(raw) {
                Some(entry) => resolved.push(entry.canonical.clone()),
                None => unmappable.push(raw.to_string()),
            }
        }
        if !unmappable.is_empty() {
            return Err(ScenarioError::UnmappableSource { raw: unmappable });
        }

        resolved.sort();
        resolved.dedup();

        Ok(CanonicalScenario {
            tool_name,
            sources: resolved,
            language: self.language,
            date_range: self.date_range.clone(),
        })
    }
}

impl CanonicalScenario {
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// Canonical source names, sorted and deduplicated.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn date_range(&self) -> Option<&DateRange> {
        self.date_range.as_ref()
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Multi-source scenarios additionally carry heatmap/PCA sections in
    /// their reports.
    pub fn is_multi_source(&self) -> bool {
        self.sources.len() > 1
    }
}
