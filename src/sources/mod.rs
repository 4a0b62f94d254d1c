//! 数据源映射注册表：数字 ID、规范名称与本地化名称之间的不可变双向映射。
//!
//! # Source Mapping Registry
//!
//! One immutable bidirectional mapping between numeric source IDs, canonical
//! names, database names and localized (Spanish) display variants. The table
//! is validated once at load time; ambiguous or duplicate rows are rejected
//! there instead of being patched per deployment environment.
//!
//! ## Built-in table
//!
//! | id | canonical         | db name             | es name           |
//! |----|-------------------|---------------------|-------------------|
//! | 1  | Google Trends     | Google Trends       | Google Trends     |
//! | 2  | Google Books      | Google Books Ngrams | Google Books      |
//! | 3  | Bain Usability    | Bain - Usabilidad   | Bain Usabilidad   |
//! | 4  | Crossref          | Crossref.org        | Crossref          |
//! | 5  | Bain Satisfaction | Bain - Satisfacción | Bain Satisfacción |
//!
//! Name matching is trimmed and case-insensitive across all variants. A
//! custom table can be supplied declaratively via [`SourceRegistry::from_entries`]
//! or a YAML file via [`SourceRegistry::from_yaml_file`].

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

static BUILTIN: Lazy<Arc<SourceRegistry>> = Lazy::new(|| {
    Arc::new(
        SourceRegistry::from_entries(builtin_entries())
            .expect("built-in source table is consistent"),
    )
});

/// Load-time validation errors for the mapping table.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate source id {id}")]
    DuplicateId { id: u32 },

    #[error("name {name:?} is ambiguous: maps to both {first:?} and {second:?}")]
    AmbiguousName {
        name: String,
        first: String,
        second: String,
    },

    #[error("source entry {canonical:?} has an empty name variant")]
    EmptyName { canonical: String },

    #[error("registry table parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("registry table I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One row of the declarative mapping table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub id: u32,
    pub canonical: String,
    pub db_name: String,
    pub es_name: String,
}

/// A raw source identifier as received from callers: a numeric ID or any
/// known name variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceRef {
    Id(u32),
    Name(String),
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceRef::Id(id) => write!(f, "{id}"),
            SourceRef::Name(name) => write!(f, "{name}"),
        }
    }
}

impl From<u32> for SourceRef {
    fn from(id: u32) -> Self {
        SourceRef::Id(id)
    }
}

impl From<&str> for SourceRef {
    fn from(name: &str) -> Self {
        SourceRef::Name(name.to_string())
    }
}

impl From<String> for SourceRef {
    fn from(name: String) -> Self {
        SourceRef::Name(name)
    }
}

/// Immutable bidirectional source mapping.
#[derive(Debug)]
pub struct SourceRegistry {
    entries: Vec<SourceEntry>,
    by_id: HashMap<u32, usize>,
    by_name: HashMap<String, usize>,
}

fn fold(name: &str) -> String {
    name.trim().to_lowercase()
}

impl SourceRegistry {
    /// Build a registry from a declarative table, rejecting duplicate IDs
    /// and ambiguous name variants.
    pub fn from_entries(entries: Vec<SourceEntry>) -> Result<Self, RegistryError> {
        let mut by_id = HashMap::new();
        let mut by_name: HashMap<String, usize> = HashMap::new();

        for (idx, entry) in entries.iter().enumerate() {
            if by_id.insert(entry.id, idx).is_some() {
                return Err(RegistryError::DuplicateId { id: entry.id });
            }
            for variant in [&entry.canonical, &entry.db_name, &entry.es_name] {
                let folded = fold(variant);
                if folded.is_empty() {
                    return Err(RegistryError::EmptyName {
                        canonical: entry.canonical.clone(),
                    });
                }
                match by_name.get(&folded) {
                    Some(&other) if other != idx => {
                        return Err(RegistryError::AmbiguousName {
                            name: variant.clone(),
                            first: entries[other].canonical.clone(),
                            second: entry.canonical.clone(),
                        });
                    }
                    _ => {
                        by_name.insert(folded, idx);
                    }
                }
            }
        }

        Ok(Self {
            entries,
            by_id,
            by_name,
        })
    }

    /// Parse a registry from a YAML table (a sequence of entries).
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RegistryError> {
        let entries: Vec<SourceEntry> = serde_yaml::from_str(yaml)?;
        Self::from_entries(entries)
    }

    /// Load a registry from a declarative YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    /// The built-in five-source table used by the dashboard.
    pub fn builtin() -> &'static SourceRegistry {
        &BUILTIN
    }

    /// Shared handle to the built-in table, for owners that also accept
    /// custom registries.
    pub fn builtin_shared() -> Arc<SourceRegistry> {
        Arc::clone(&BUILTIN)
    }

    /// Resolve a raw identifier to its table entry. Returns `None` for
    /// unmappable input; the caller decides how to surface that.
    pub fn resolve(&self, raw: &SourceRef) -> Option<&SourceEntry> {
        match raw {
            SourceRef::Id(id) => self.by_id.get(id).map(|&i| &self.entries[i]),
            SourceRef::Name(name) => self.by_name.get(&fold(name)).map(|&i| &self.entries[i]),
        }
    }

    /// Look up an entry by canonical name.
    pub fn get(&self, canonical: &str) -> Option<&SourceEntry> {
        self.by_name
            .get(&fold(canonical))
            .map(|&i| &self.entries[i])
            .filter(|e| fold(&e.canonical) == fold(canonical))
    }

    /// All canonical names, in table order.
    pub fn canonical_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.canonical.as_str()).collect()
    }

    pub fn entries(&self) -> &[SourceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn builtin_entries() -> Vec<SourceEntry> {
    fn entry(id: u32, canonical: &str, db_name: &str, es_name: &str) -> SourceEntry {
        SourceEntry {
            id,
            canonical: canonical.to_string(),
            db_name: db_name.to_string(),
            es_name: es_name.to_string(),
        }
    }
    vec![
        entry(1, "Google Trends", "Google Trends", "Google Trends"),
        entry(2, "Google Books", "Google Books Ngrams", "Google Books"),
        entry(3, "Bain Usability", "Bain - Usabilidad", "Bain Usabilidad"),
        entry(4, "Crossref", "Crossref.org", "Crossref"),
        entry(5, "Bain Satisfaction", "Bain - Satisfacción", "Bain Satisfacción"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_loads() {
        let registry = SourceRegistry::builtin();
        assert_eq!(registry.len(), 5);
        assert_eq!(
            registry.canonical_names(),
            vec![
                "Google Trends",
                "Google Books",
                "Bain Usability",
                "Crossref",
                "Bain Satisfaction"
            ]
        );
    }

    #[test]
    fn resolves_all_name_variants() {
        let registry = SourceRegistry::builtin();
        let books = registry
            .resolve(&SourceRef::from("Google Books Ngrams"))
            .unwrap();
        assert_eq!(books.canonical, "Google Books");

        let usability = registry
            .resolve(&SourceRef::from("bain usabilidad"))
            .unwrap();
        assert_eq!(usability.canonical, "Bain Usability");

        let crossref = registry.resolve(&SourceRef::Id(4)).unwrap();
        assert_eq!(crossref.canonical, "Crossref");
    }

    #[test]
    fn resolve_trims_and_ignores_case() {
        let registry = SourceRegistry::builtin();
        let entry = registry.resolve(&SourceRef::from("  CROSSREF.ORG  ")).unwrap();
        assert_eq!(entry.canonical, "Crossref");
    }

    #[test]
    fn unknown_identifiers_do_not_resolve() {
        let registry = SourceRegistry::builtin();
        assert!(registry.resolve(&SourceRef::from("NotARealSource")).is_none());
        assert!(registry.resolve(&SourceRef::Id(42)).is_none());
    }

    #[test]
    fn duplicate_id_is_rejected_at_load() {
        let mut entries = builtin_entries();
        entries[1].id = 1;
        let err = SourceRegistry::from_entries(entries).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateId { id: 1 }));
    }

    #[test]
    fn ambiguous_name_is_rejected_at_load() {
        let mut entries = builtin_entries();
        entries[1].es_name = "Google Trends".to_string();
        let err = SourceRegistry::from_entries(entries).unwrap_err();
        assert!(matches!(err, RegistryError::AmbiguousName { .. }));
    }

    #[test]
    fn yaml_table_round_trips() {
        let yaml = r#"
- id: 1
  canonical: Google Trends
  db_name: Google Trends
  es_name: Google Trends
- id: 2
  canonical: Google Books
  db_name: Google Books Ngrams
  es_name: Google Books
"#;
        let registry = SourceRegistry::from_yaml_str(yaml).unwrap();
        assert_eq!(registry.len(), 2);
        let books = registry.resolve(&SourceRef::from("google books ngrams")).unwrap();
        assert_eq!(books.id, 2);
    }
}
