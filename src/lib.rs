//! # key-findings
//!
//! 场景指纹缓存：为管理工具分析仪表盘的 "Key Findings" 叙述报告提供确定性指纹、
//! 分层查找与生成回写。
//!
//! Scenario-fingerprint cache for AI-generated Key Findings reports:
//! deterministic hashing of analysis scenarios, tiered cache lookup, and
//! write-back of freshly generated narratives.
//!
//! ## Overview
//!
//! A scenario — the tuple of (management tool, selected data sources,
//! language, date range) — is normalized into a canonical form, hashed
//! into a stable fingerprint, and resolved through three tiers in order:
//! the primary report cache, a precomputed-findings fallback (hits are
//! promoted into the primary cache), and finally the external
//! LLM-backed generator, whose output is persisted for the next caller.
//!
//! ## Core Guarantees
//!
//! - **Order-independent**: scenarios differing only in source-list order
//!   produce the identical fingerprint
//! - **Deterministic**: identical canonical scenario, identical
//!   fingerprint, always — no timestamps or randomness in the hashed payload
//! - **Explicit rejection**: unmappable source identifiers surface as
//!   errors listing the offending input, never as silent cache misses
//! - **Single-flight**: concurrent resolves for one fingerprint share a
//!   single generation instead of racing the expensive external call
//!
//! ## Quick Start
//!
//! ```rust
//! use key_findings::{Language, Scenario, SourceRef, SourceRegistry};
//!
//! let scenario = Scenario::new(
//!     "Benchmarking",
//!     vec![SourceRef::from("Google Books"), SourceRef::from("Google Trends")],
//!     Language::Es,
//! );
//! let canonical = scenario.normalize(SourceRegistry::builtin())?;
//! println!("cache key: {}", canonical.fingerprint());
//! # Ok::<(), key_findings::Error>(())
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`sources`] | Immutable bidirectional source-name mapping registry |
//! | [`scenario`] | Raw scenario, normalization, fingerprint derivation |
//! | [`report`] | Typed narrative report artifact and shape policy |
//! | [`store`] | Primary/secondary storage contracts and backends |
//! | [`generator`] | External narrative-generation contract |
//! | [`resolver`] | Tiered lookup with promotion and write-back |

pub mod generator;
pub mod report;
pub mod resolver;
pub mod scenario;
pub mod sources;
pub mod store;

// Re-export main types for convenience
pub use generator::NarrativeGenerator;
pub use report::{CommonSections, Finding, MultiSourceSections, Report, ReportMeta};
pub use resolver::{Resolution, ResolutionSource, Resolver, ResolverConfig, ResolverStats};
pub use scenario::{
    CanonicalScenario, CombinationKey, DateRange, Fingerprint, Language, Scenario,
};
pub use sources::{SourceEntry, SourceRef, SourceRegistry};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::Error;
