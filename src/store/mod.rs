//! 存储后端模块：报告缓存与预计算结果的可插拔存储契约。
//!
//! # Storage Backends
//!
//! Storage contracts for the two lookup tiers, with in-memory and
//! file-persisted implementations.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`ReportStore`] | Primary report cache contract (read/write, bulk clear) |
//! | [`PrecomputedStore`] | Secondary precomputed-findings contract (read-only) |
//! | [`MemoryReportStore`] | In-memory primary store with access bookkeeping |
//! | [`FileReportStore`] | JSON-file persisted primary store |
//! | [`NullReportStore`] | No-op primary store for disabling caching |
//! | [`MemoryPrecomputedStore`] | Seedable in-memory secondary store |
//! | [`NullPrecomputedStore`] | Empty secondary store |
//!
//! The primary store is keyed by [`Fingerprint`](crate::scenario::Fingerprint)
//! and mutated only via insert-or-replace; the secondary store is addressed
//! by the 3-field combination key and never written by the resolver.

mod backend;
mod file;
mod precomputed;

pub use backend::{MemoryReportStore, NullReportStore, ReportStore};
pub use file::FileReportStore;
pub use precomputed::{MemoryPrecomputedStore, NullPrecomputedStore, PrecomputedStore};

use thiserror::Error;

/// Storage failures. A failed lookup must surface as one of these, never
/// as a silently empty result.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{backend} store unavailable: {details}")]
    Unavailable {
        backend: &'static str,
        details: String,
    },

    #[error("{backend} store data corrupt: {details}")]
    Corrupt {
        backend: &'static str,
        details: String,
    },
}

impl StoreError {
    pub fn unavailable(backend: &'static str, details: impl Into<String>) -> Self {
        StoreError::Unavailable {
            backend,
            details: details.into(),
        }
    }

    pub fn corrupt(backend: &'static str, details: impl Into<String>) -> Self {
        StoreError::Corrupt {
            backend,
            details: details.into(),
        }
    }
}
