//! 分层查找解析器：缓存优先检索、预计算回退与生成回写。
//!
//! # Tiered Lookup Resolver
//!
//! Orchestrates cache-first retrieval for Key Findings reports. Each
//! resolve runs a fixed state machine: normalize the scenario, derive the
//! fingerprint, try the primary report cache, fall back to the
//! precomputed-findings store (promoting hits into the primary cache),
//! and only then invoke the external generator under a bounded timeout,
//! persisting the result for the next caller.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Resolver`] | The lookup engine; one public entry point, [`Resolver::resolve`] |
//! | [`ResolverConfig`] | Generation timeout, cache bypass, single-flight toggle |
//! | [`Resolution`] | A served report plus which tier answered |
//! | [`ResolverStats`] | Atomic hit/miss/failure counters |

mod config;
mod engine;
mod stats;

pub use config::ResolverConfig;
pub use engine::{Resolution, ResolutionSource, Resolver};
pub use stats::ResolverStats;
