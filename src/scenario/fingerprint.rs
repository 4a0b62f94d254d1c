//! Deterministic fingerprints and derived store keys.
//!
//! The hashed payload uses a fixed field order: tool_name, sources_joined,
//! language, date_range_start, date_range_end. This order is a compatibility
//! contract — reordering it changes every existing fingerprint and silently
//! invalidates the whole cache.

use super::normalize::CanonicalScenario;
use super::Language;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Content-addressed cache key: lowercase hex SHA-256 of the canonical
/// scenario payload. Identical canonical scenario, identical fingerprint,
/// always.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub const HEX_LEN: usize = 64;

    /// Parse a fingerprint from its hex representation. Accepts exactly
    /// 64 lowercase hex characters.
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() == Self::HEX_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            Some(Self(s.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Field declaration order is the serialized order; see the module contract.
#[derive(Serialize)]
struct HashPayload<'a> {
    tool_name: &'a str,
    sources_joined: String,
    language: &'a str,
    date_range_start: &'a str,
    date_range_end: &'a str,
}

fn hex_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn snake(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '-'], "_")
}

impl CanonicalScenario {
    /// Primary-store key. Pure and total: no I/O, no timestamps, safe to
    /// call concurrently.
    pub fn fingerprint(&self) -> Fingerprint {
        let payload = HashPayload {
            tool_name: self.tool_name(),
            sources_joined: self
                .sources()
                .iter()
                .map(|s| s.to_lowercase())
                .collect::<Vec<_>>()
                .join("|"),
            language: self.language().code(),
            date_range_start: self.date_range().map(|r| r.start()).unwrap_or(""),
            date_range_end: self.date_range().map(|r| r.end()).unwrap_or(""),
        };
        let canonical = serde_json::to_string(&payload).unwrap_or_default();
        Fingerprint(hex_digest(canonical.as_bytes()))
    }

    /// Secondary-store key: the precomputed-findings store is addressed by
    /// (tool, sources-as-joined-text, language) rather than the primary
    /// fingerprint. Both keys derive from the same canonical scenario, so
    /// the two stores can never disagree about which scenario a row
    /// belongs to.
    pub fn combination_key(&self) -> CombinationKey {
        CombinationKey {
            tool_name: self.tool_name().to_string(),
            sources_text: self.sources().join(", "),
            language: self.language(),
        }
    }
}

/// The 3-field key shape used by the precomputed-findings store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombinationKey {
    tool_name: String,
    sources_text: String,
    language: Language,
}

// Fixed field order for the encoded digest suffix.
#[derive(Serialize)]
struct CombinationPayload<'a> {
    tool: &'a str,
    sources: String,
    language: &'a str,
}

impl CombinationKey {
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// Canonical source names joined with `", "`, already sorted.
    pub fn sources_text(&self) -> &str {
        &self.sources_text
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Dense row identifier: snake-cased tool and sources, language code,
    /// and a 10-hex digest suffix to disambiguate truncated names.
    pub fn encode(&self) -> String {
        let sources_snake = self
            .sources_text
            .split(", ")
            .map(snake)
            .collect::<Vec<_>>()
            .join("_");
        let payload = CombinationPayload {
            tool: &self.tool_name,
            sources: sources_snake.clone(),
            language: self.language.code(),
        };
        let canonical = serde_json::to_string(&payload).unwrap_or_default();
        let digest = hex_digest(canonical.as_bytes());
        format!(
            "{}_{}_{}_{}",
            snake(&self.tool_name),
            sources_snake,
            self.language.code(),
            &digest[..10]
        )
    }
}
