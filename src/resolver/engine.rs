//! The tiered lookup state machine.

use super::config::ResolverConfig;
use super::stats::{AtomicStats, ResolverStats};
use crate::generator::NarrativeGenerator;
use crate::report::Report;
use crate::scenario::{CanonicalScenario, Fingerprint, Scenario};
use crate::sources::SourceRegistry;
use crate::store::{PrecomputedStore, ReportStore};
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Which tier served a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    Primary,
    Secondary,
    Generated,
}

/// A served lookup: the report plus where it came from.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub report: Report,
    pub cache_hit: bool,
    pub source: ResolutionSource,
    pub fingerprint: Fingerprint,
    pub elapsed_ms: u64,
}

/// Cache-first retrieval with precomputed fallback and generation
/// write-back.
///
/// Call order per resolve: normalize, hash, primary lookup, secondary
/// lookup (with promotion into primary on hit), then bounded generation
/// with write-back. With single-flight enabled, concurrent resolves for
/// the same fingerprint serialize on a per-key lock and re-check the
/// primary store before generating, so at most one generation runs per
/// fingerprint at a time.
///
/// A caller dropping a `resolve` future mid-generation discards the
/// generation; nothing is written, and the store is never left partially
/// updated.
pub struct Resolver {
    registry: Arc<SourceRegistry>,
    primary: Arc<dyn ReportStore>,
    secondary: Arc<dyn PrecomputedStore>,
    generator: Arc<dyn NarrativeGenerator>,
    config: ResolverConfig,
    stats: AtomicStats,
    in_flight: Mutex<HashMap<Fingerprint, Arc<Mutex<()>>>>,
}

impl Resolver {
    /// Build a resolver over the built-in source registry with default
    /// configuration.
    pub fn new(
        primary: Arc<dyn ReportStore>,
        secondary: Arc<dyn PrecomputedStore>,
        generator: Arc<dyn NarrativeGenerator>,
    ) -> Self {
        Self {
            registry: SourceRegistry::builtin_shared(),
            primary,
            secondary,
            generator,
            config: ResolverConfig::default(),
            stats: AtomicStats::new(),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_registry(mut self, registry: Arc<SourceRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn stats(&self) -> ResolverStats {
        self.stats.to_stats()
    }

    /// Bulk-invalidate the primary store. Returns the number of deleted
    /// entries.
    pub async fn clear(&self) -> Result<u64> {
        let count = self.primary.delete_all().await?;
        info!(count, store = self.primary.name(), "cleared report cache");
        Ok(count)
    }

    /// Single public entry point: resolve a raw scenario to a report.
    pub async fn resolve(&self, scenario: &Scenario) -> Result<Resolution> {
        let started = Instant::now();

        let canonical = match scenario.normalize(&self.registry) {
            Ok(canonical) => canonical,
            Err(e) => {
                AtomicStats::bump(&self.stats.rejected);
                warn!(error = %e, "scenario rejected");
                return Err(e.into());
            }
        };
        let fingerprint = canonical.fingerprint();
        debug!(%fingerprint, tool = canonical.tool_name(), "resolving scenario");

        if !self.config.enabled {
            let report = self.generate_bounded(&canonical).await?;
            return Ok(self.served(
                report,
                ResolutionSource::Generated,
                fingerprint,
                started,
            ));
        }

        if let Some(report) = self.primary.get(&fingerprint).await? {
            AtomicStats::bump(&self.stats.primary_hits);
            debug!(%fingerprint, "primary hit");
            return Ok(self.served(report, ResolutionSource::Primary, fingerprint, started));
        }

        // The secondary store is addressed by its own key shape, derived
        // from the same canonical scenario as the fingerprint.
        let key = canonical.combination_key();
        if let Some(report) = self
            .secondary
            .find(key.tool_name(), key.sources_text(), key.language())
            .await?
        {
            report.check_shape(canonical.is_multi_source())?;
            self.primary.put(&fingerprint, &report).await?;
            AtomicStats::bump(&self.stats.secondary_hits);
            info!(%fingerprint, "promoted precomputed findings into primary store");
            return Ok(self.served(report, ResolutionSource::Secondary, fingerprint, started));
        }

        if self.config.single_flight {
            let gate = self.acquire_gate(&fingerprint).await;
            let _guard = gate.lock().await;

            // Another caller may have finished generating while we waited.
            if let Some(report) = self.primary.get(&fingerprint).await? {
                AtomicStats::bump(&self.stats.primary_hits);
                debug!(%fingerprint, "primary hit after awaiting in-flight generation");
                self.release_gate(&fingerprint).await;
                return Ok(self.served(report, ResolutionSource::Primary, fingerprint, started));
            }

            let outcome = self.generate_and_store(&canonical, &fingerprint).await;
            self.release_gate(&fingerprint).await;
            let report = outcome?;
            return Ok(self.served(report, ResolutionSource::Generated, fingerprint, started));
        }

        let report = self.generate_and_store(&canonical, &fingerprint).await?;
        Ok(self.served(report, ResolutionSource::Generated, fingerprint, started))
    }

    fn served(
        &self,
        report: Report,
        source: ResolutionSource,
        fingerprint: Fingerprint,
        started: Instant,
    ) -> Resolution {
        Resolution {
            report,
            cache_hit: source != ResolutionSource::Generated,
            source,
            fingerprint,
            elapsed_ms: started.elapsed().as_millis() as u64,
        }
    }

    async fn acquire_gate(&self, fingerprint: &Fingerprint) -> Arc<Mutex<()>> {
        let mut map = self.in_flight.lock().await;
        Arc::clone(
            map.entry(fingerprint.clone())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    // Waiters still holding a clone of the gate keep it alive; removal
    // only stops new resolvers from reusing it once the primary store is
    // warm.
    async fn release_gate(&self, fingerprint: &Fingerprint) {
        self.in_flight.lock().await.remove(fingerprint);
    }

    async fn generate_and_store(
        &self,
        canonical: &CanonicalScenario,
        fingerprint: &Fingerprint,
    ) -> Result<Report> {
        let report = self.generate_bounded(canonical).await?;
        self.primary.put(fingerprint, &report).await?;
        info!(%fingerprint, model = %report.meta.model_used, "generated and cached report");
        Ok(report)
    }

    async fn generate_bounded(&self, canonical: &CanonicalScenario) -> Result<Report> {
        let timeout = self.config.generation_timeout;
        debug!(
            generator = self.generator.name(),
            timeout_ms = timeout.as_millis() as u64,
            "invoking generator"
        );
        match tokio::time::timeout(timeout, self.generator.generate(canonical)).await {
            Err(_) => {
                AtomicStats::bump(&self.stats.timeouts);
                warn!(
                    generator = self.generator.name(),
                    waited_ms = timeout.as_millis() as u64,
                    "generation timed out"
                );
                Err(Error::GenerationTimeout {
                    waited_ms: timeout.as_millis() as u64,
                })
            }
            Ok(Err(e)) => {
                AtomicStats::bump(&self.stats.failures);
                warn!(error = %e, "generation failed");
                match e {
                    failure @ Error::GenerationFailure { .. } => Err(failure),
                    other => Err(Error::generation(other.to_string())),
                }
            }
            Ok(Ok(report)) => {
                if let Err(violation) = report.check_shape(canonical.is_multi_source()) {
                    AtomicStats::bump(&self.stats.failures);
                    return Err(Error::generation(violation.to_string()));
                }
                AtomicStats::bump(&self.stats.generated);
                Ok(report)
            }
        }
    }
}
