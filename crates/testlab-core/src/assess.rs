// crates/testlab-core/src/assess.rs
// ============================================================================
// Module: Heuristic Assessor
// Description: Threshold rules mapping summary statistics to verdicts.
// Purpose: Derive a qualitative rating and recommendations for lab responses.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The assessor is a pure, deterministic mapping from [`SummaryStatistics`] to
//! an [`Assessment`]: identical inputs always yield identical output, and the
//! recommendation list is never empty. Thresholds are fixed; there is no
//! randomness here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::metrics::summary::SummaryStatistics;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Mean latency above which the rating drops to `Fair`, in milliseconds.
const FAIR_LATENCY_MS: u32 = 300;
/// Mean latency above which the rating drops to `Poor`, in milliseconds.
const POOR_LATENCY_MS: u32 = 500;
/// Mean error rate above which the rating is forced to `Poor`, in percent.
const POOR_ERROR_RATE_PCT: f64 = 5.0;
/// Mean error rate above which a monitoring warning is added, in percent.
const WARN_ERROR_RATE_PCT: f64 = 1.0;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Ordered qualitative performance rating.
///
/// # Invariants
/// - Wire names are stable title-case labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum PerformanceRating {
    /// All thresholds respected.
    Good,
    /// Latency above the first threshold.
    Fair,
    /// Latency or error rate above the hard threshold.
    Poor,
}

impl PerformanceRating {
    /// Returns the stable label for the rating.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }
}

/// Qualitative verdict derived from summary statistics.
///
/// # Invariants
/// - `recommendations` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assessment {
    /// Overall performance rating.
    #[serde(rename = "overallPerformance")]
    pub overall_performance: PerformanceRating,
    /// Freeform remediation or monitoring recommendations.
    pub recommendations: Vec<String>,
    /// Headline figures restated for display.
    #[serde(rename = "keyFindings")]
    pub key_findings: Vec<String>,
}

// ============================================================================
// SECTION: Assessment
// ============================================================================

/// Maps summary statistics to a qualitative assessment.
///
/// Pure and deterministic: no randomness, no hidden state.
#[must_use]
pub fn assess(summary: &SummaryStatistics) -> Assessment {
    let mut rating = PerformanceRating::Good;
    let mut recommendations = Vec::new();

    if summary.average_latency_ms > POOR_LATENCY_MS {
        rating = PerformanceRating::Poor;
        recommendations.push(
            "Response times are high - consider optimizing backend performance".to_string(),
        );
    } else if summary.average_latency_ms > FAIR_LATENCY_MS {
        rating = PerformanceRating::Fair;
        recommendations
            .push("Response times could be improved - investigate slow endpoints".to_string());
    }

    if summary.average_error_rate_pct > POOR_ERROR_RATE_PCT {
        rating = PerformanceRating::Poor;
        recommendations.push("High error rate detected - check application stability".to_string());
    } else if summary.average_error_rate_pct > WARN_ERROR_RATE_PCT {
        recommendations.push("Monitor error rate - ensure proper error handling".to_string());
    }

    if summary.percentiles.p95 > summary.average_latency_ms.saturating_mul(2) {
        recommendations
            .push("High response time variance - investigate performance outliers".to_string());
    }

    if recommendations.is_empty() {
        recommendations.push("Performance looks healthy - continue monitoring".to_string());
    }

    let key_findings = vec![
        format!("Average response time: {}ms", summary.average_latency_ms),
        format!("Peak RPS achieved: {}", summary.max_rps),
        format!("Total requests processed: {}", summary.total_requests),
        format!("Error rate: {}%", summary.average_error_rate_pct),
    ];

    Assessment {
        overall_performance: rating,
        recommendations,
        key_findings,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions are permitted."
    )]

    use super::PerformanceRating;
    use super::assess;
    use crate::metrics::summary::LatencyPercentiles;
    use crate::metrics::summary::SummaryStatistics;

    /// Builds summary statistics with the given mean latency, error rate, and p95.
    fn stats(average_latency_ms: u32, error_pct: f64, p95: u32) -> SummaryStatistics {
        SummaryStatistics {
            total_requests: 1_000,
            average_latency_ms,
            max_latency_ms: p95,
            min_latency_ms: 50,
            average_rps: 20.0,
            max_rps: 25.0,
            total_errors: 2,
            average_error_rate_pct: error_pct,
            percentiles: LatencyPercentiles {
                p50: average_latency_ms,
                p90: p95,
                p95,
                p99: p95,
            },
        }
    }

    #[test]
    fn healthy_stats_rate_good_with_affirmative_recommendation() {
        let verdict = assess(&stats(150, 0.5, 200));
        assert_eq!(verdict.overall_performance, PerformanceRating::Good);
        assert_eq!(verdict.recommendations.len(), 1);
        assert!(verdict.recommendations[0].contains("healthy"));
    }

    #[test]
    fn latency_thresholds_downgrade_the_rating() {
        assert_eq!(assess(&stats(350, 0.5, 400)).overall_performance, PerformanceRating::Fair);
        assert_eq!(assess(&stats(600, 0.5, 700)).overall_performance, PerformanceRating::Poor);
    }

    #[test]
    fn high_error_rate_forces_poor() {
        let verdict = assess(&stats(150, 6.0, 200));
        assert_eq!(verdict.overall_performance, PerformanceRating::Poor);
        assert!(verdict.recommendations.iter().any(|r| r.contains("error rate")));
    }

    #[test]
    fn outlier_p95_adds_variance_recommendation() {
        let verdict = assess(&stats(150, 0.5, 400));
        assert!(verdict.recommendations.iter().any(|r| r.contains("variance")));
    }

    #[test]
    fn assessment_is_deterministic() {
        let input = stats(350, 2.0, 900);
        assert_eq!(assess(&input), assess(&input));
    }

    #[test]
    fn recommendations_are_never_empty() {
        for latency in [100, 350, 600] {
            for error in [0.0, 2.0, 8.0] {
                assert!(!assess(&stats(latency, error, latency)).recommendations.is_empty());
            }
        }
    }
}
