//! Typed Key Findings report artifact.
//!
//! The report replaces the dynamic dict payloads of earlier iterations with
//! a structural split: [`CommonSections`] is always present, heatmap/PCA
//! content lives in [`MultiSourceSections`] and exists only for
//! multi-source scenarios. The shape policy is enforced at construction
//! and at every store boundary via [`Report::check_shape`], not filtered
//! at render time.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Shape-policy violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportShapeError {
    #[error("single-source report carries multi-source sections")]
    UnexpectedMultiSource,

    #[error("multi-source report is missing heatmap/PCA sections")]
    MissingMultiSource,
}

/// One principal finding bullet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub bullet_point: String,
    pub reasoning: String,
    pub data_source: String,
    pub confidence: f64,
}

/// Narrative sections present in every report.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CommonSections {
    pub executive_summary: String,
    pub principal_findings: Vec<Finding>,
    pub temporal_analysis: String,
    pub seasonal_analysis: String,
    pub spectral_analysis: String,
    pub strategic_synthesis: String,
    pub conclusions: String,
}

/// Sections that only exist for multi-source scenarios.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MultiSourceSections {
    pub heatmap_analysis: String,
    pub pca_analysis: String,
}

/// How deep the generating analysis went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisDepth {
    Basic,
    Comprehensive,
    Advanced,
}

impl Default for AnalysisDepth {
    fn default() -> Self {
        AnalysisDepth::Comprehensive
    }
}

/// Generation metadata attached to a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    pub model_used: String,
    pub confidence_score: f64,
    pub data_points_analyzed: u64,
    pub api_latency_ms: u64,
    pub generated_at_unix: u64,
    pub analysis_depth: AnalysisDepth,
}

impl ReportMeta {
    pub fn new(model_used: impl Into<String>) -> Self {
        Self {
            model_used: model_used.into(),
            confidence_score: 0.0,
            data_points_analyzed: 0,
            api_latency_ms: 0,
            generated_at_unix: unix_now(),
            analysis_depth: AnalysisDepth::default(),
        }
    }

    pub fn with_confidence(mut self, score: f64) -> Self {
        self.confidence_score = score;
        self
    }

    pub fn with_data_points(mut self, count: u64) -> Self {
        self.data_points_analyzed = count;
        self
    }

    pub fn with_latency_ms(mut self, latency: u64) -> Self {
        self.api_latency_ms = latency;
        self
    }

    pub fn with_depth(mut self, depth: AnalysisDepth) -> Self {
        self.analysis_depth = depth;
        self
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// The cached narrative artifact for one fingerprint. Created once,
/// immutable thereafter; invalidation is a bulk store operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub sections: CommonSections,
    pub multi_source: Option<MultiSourceSections>,
    pub meta: ReportMeta,
}

impl Report {
    pub fn single_source(sections: CommonSections, meta: ReportMeta) -> Self {
        Self {
            sections,
            multi_source: None,
            meta,
        }
    }

    pub fn multi_source(
        sections: CommonSections,
        extra: MultiSourceSections,
        meta: ReportMeta,
    ) -> Self {
        Self {
            sections,
            multi_source: Some(extra),
            meta,
        }
    }

    /// Enforce the shape policy against the scenario's arity:
    /// single-source reports never carry heatmap/PCA content, multi-source
    /// reports always do.
    pub fn check_shape(&self, multi_source_scenario: bool) -> Result<(), ReportShapeError> {
        match (multi_source_scenario, self.multi_source.is_some()) {
            (false, true) => Err(ReportShapeError::UnexpectedMultiSource),
            (true, false) => Err(ReportShapeError::MissingMultiSource),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections() -> CommonSections {
        CommonSections {
            executive_summary: "summary".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn shape_policy_rejects_mismatched_arity() {
        let single = Report::single_source(sections(), ReportMeta::new("kimi-k2"));
        assert!(single.check_shape(false).is_ok());
        assert_eq!(
            single.check_shape(true),
            Err(ReportShapeError::MissingMultiSource)
        );

        let multi = Report::multi_source(
            sections(),
            MultiSourceSections::default(),
            ReportMeta::new("kimi-k2"),
        );
        assert!(multi.check_shape(true).is_ok());
        assert_eq!(
            multi.check_shape(false),
            Err(ReportShapeError::UnexpectedMultiSource)
        );
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = Report::multi_source(
            CommonSections {
                executive_summary: "resumen".to_string(),
                principal_findings: vec![Finding {
                    bullet_point: "adoption peaked in 2019".to_string(),
                    reasoning: "trend reversal across sources".to_string(),
                    data_source: "Google Trends".to_string(),
                    confidence: 0.82,
                }],
                ..Default::default()
            },
            MultiSourceSections {
                heatmap_analysis: "strong pairwise correlation".to_string(),
                pca_analysis: "first component dominates".to_string(),
            },
            ReportMeta::new("kimi-k2")
                .with_confidence(0.8)
                .with_data_points(1240)
                .with_latency_ms(2100),
        );
        let json = serde_json::to_string(&report).unwrap();
        let back: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
