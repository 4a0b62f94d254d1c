//! Per-resolver counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of resolver counters.
#[derive(Debug, Clone, Default)]
pub struct ResolverStats {
    pub primary_hits: u64,
    pub secondary_hits: u64,
    pub generated: u64,
    pub rejected: u64,
    pub failures: u64,
    pub timeouts: u64,
}

impl ResolverStats {
    /// Share of served calls answered from either cache tier.
    pub fn hit_ratio(&self) -> f64 {
        let served = self.primary_hits + self.secondary_hits + self.generated;
        if served == 0 {
            0.0
        } else {
            (self.primary_hits + self.secondary_hits) as f64 / served as f64
        }
    }
}

pub(crate) struct AtomicStats {
    pub primary_hits: AtomicU64,
    pub secondary_hits: AtomicU64,
    pub generated: AtomicU64,
    pub rejected: AtomicU64,
    pub failures: AtomicU64,
    pub timeouts: AtomicU64,
}

impl AtomicStats {
    pub fn new() -> Self {
        Self {
            primary_hits: AtomicU64::new(0),
            secondary_hits: AtomicU64::new(0),
            generated: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            timeouts: AtomicU64::new(0),
        }
    }

    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn to_stats(&self) -> ResolverStats {
        ResolverStats {
            primary_hits: self.primary_hits.load(Ordering::Relaxed),
            secondary_hits: self.secondary_hits.load(Ordering::Relaxed),
            generated: self.generated.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
        }
    }
}
