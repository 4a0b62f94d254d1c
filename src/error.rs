use crate::report::ReportShapeError;
use crate::scenario::ScenarioError;
use crate::sources::RegistryError;
use crate::store::StoreError;
use thiserror::Error;

/// Unified error type for the Key Findings cache.
/// This aggregates all module-level errors into actionable, high-level categories.
#[derive(Debug, Error)]
pub enum Error {
    /// The scenario could not be canonicalized (unmappable sources, bad
    /// language code, empty selection). Terminal `Rejected` for a lookup.
    #[error("scenario rejected: {0}")]
    Scenario(#[from] ScenarioError),

    /// The source mapping table failed load-time validation.
    #[error("source registry error: {0}")]
    Registry(#[from] RegistryError),

    /// A storage backend was unreachable or returned corrupt data.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The external generator raised an error or returned a malformed
    /// payload. Never retried by the resolver itself.
    #[error("generation failed: {message}")]
    GenerationFailure { message: String },

    /// The bounded wait on the external generator elapsed. Surfaced
    /// distinctly from generic failure so callers can retry with backoff.
    #[error("generation timed out after {waited_ms} ms")]
    GenerationTimeout { waited_ms: u64 },

    /// A report pulled from a store violates the single/multi-source
    /// shape policy.
    #[error("malformed report: {0}")]
    MalformedReport(#[from] ReportShapeError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new generation failure from any displayable cause.
    pub fn generation(message: impl Into<String>) -> Self {
        Error::GenerationFailure {
            message: message.into(),
        }
    }

    /// True when the error is a scenario rejection rather than a
    /// lookup/generation fault.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Error::Scenario(_))
    }

    /// True for the distinct timeout class.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::GenerationTimeout { .. })
    }
}
