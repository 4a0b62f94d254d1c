//! Scenario types: the raw analysis request, its canonical form, and the
//! fingerprints derived from it.
//!
//! A [`Scenario`] is the tuple of inputs that identifies one distinct
//! analysis request (tool, sources, language, date range). Normalization
//! through [`Scenario::normalize`] yields a [`CanonicalScenario`], the only
//! value the hashers accept, so every fingerprint in the system is derived
//! from the same canonical shape.

mod fingerprint;
mod normalize;

pub use fingerprint::{CombinationKey, Fingerprint};
pub use normalize::CanonicalScenario;

use crate::sources::SourceRef;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Scenario rejection reasons.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// One or more raw source identifiers did not resolve against the
    /// mapping table. The offending identifiers are listed verbatim;
    /// they are never silently dropped.
    #[error("unmappable source identifier(s): {}", .raw.join(", "))]
    UnmappableSource { raw: Vec<String> },

    #[error("unsupported language {0:?} (expected \"es\" or \"en\")")]
    UnsupportedLanguage(String),

    #[error("scenario has no sources selected")]
    EmptySources,

    #[error("scenario tool name is empty")]
    EmptyToolName,

    #[error("invalid date range: {0}")]
    InvalidDateRange(String),
}

/// Analysis language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Es,
    En,
}

impl Language {
    /// Two-letter lowercase code, the form that enters the hash payload.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Es => "es",
            Language::En => "en",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Es
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "es" => Ok(Language::Es),
            "en" => Ok(Language::En),
            other => Err(ScenarioError::UnsupportedLanguage(other.to_string())),
        }
    }
}

/// Inclusive analysis date range, ISO `YYYY-MM-DD` on both ends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: String,
    end: String,
}

impl DateRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Result<Self, ScenarioError> {
        let start = start.into().trim().to_string();
        let end = end.into().trim().to_string();
        if !is_iso_date(&start) {
            return Err(ScenarioError::InvalidDateRange(format!(
                "start {start:?} is not YYYY-MM-DD"
            )));
        }
        if !is_iso_date(&end) {
            return Err(ScenarioError::InvalidDateRange(format!(
                "end {end:?} is not YYYY-MM-DD"
            )));
        }
        // ISO dates order lexicographically.
        if start > end {
            return Err(ScenarioError::InvalidDateRange(format!(
                "start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }
}

fn is_iso_date(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }
    bytes
        .iter()
        .enumerate()
        .all(|(i, b)| matches!(i, 4 | 7) || b.is_ascii_digit())
}

/// A raw analysis request, as received from the UI layer.
///
/// Source identifiers may arrive as numeric IDs, canonical names, database
/// names or localized names in any mix and order; normalization resolves
/// all of them before anything is hashed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub tool_name: String,
    pub sources: Vec<SourceRef>,
    pub language: Language,
    pub date_range: Option<DateRange>,
}

impl Scenario {
    pub fn new(
        tool_name: impl Into<String>,
        sources: Vec<SourceRef>,
        language: Language,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            sources,
            language,
            date_range: None,
        }
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }
}
