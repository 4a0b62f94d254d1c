//! Resolver configuration.

use std::time::Duration;

/// Tunables for the tiered lookup.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Bounded wait on the external generator. A timeout surfaces as a
    /// distinct error, never as an indefinite hang.
    pub generation_timeout: Duration,
    /// When false the resolver bypasses both stores and write-back,
    /// calling the generator on every resolve.
    pub enabled: bool,
    /// Serialize concurrent generations for the same fingerprint. When
    /// off, concurrent resolvers for one fingerprint may each call the
    /// generator redundantly (last write wins, content is idempotent
    /// per fingerprint).
    pub single_flight: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            generation_timeout: Duration::from_secs(45),
            enabled: true,
            single_flight: true,
        }
    }
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_single_flight(mut self, single_flight: bool) -> Self {
        self.single_flight = single_flight;
        self
    }
}
