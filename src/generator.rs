//! Narrative generation contract.
//!
//! The generator is the expensive tier: an external LLM-backed service
//! producing the narrative report for a scenario. Output is expected to be
//! semantically similar but not byte-identical across calls for the same
//! scenario; that non-determinism is tolerated because content is cached
//! per fingerprint. Retry policy, if any, lives inside the generator —
//! the resolver never retries on its behalf.

use crate::report::Report;
use crate::scenario::CanonicalScenario;
use crate::Result;
use async_trait::async_trait;

/// External narrative-generation service.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    /// Produce a fresh report for the canonical scenario. Slow and
    /// I/O-bound; the resolver bounds the wait with its configured
    /// timeout.
    async fn generate(&self, scenario: &CanonicalScenario) -> Result<Report>;

    fn name(&self) -> &'static str {
        "generator"
    }
}
