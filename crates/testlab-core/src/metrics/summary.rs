// crates/testlab-core/src/metrics/summary.rs
// ============================================================================
// Module: Summary Statistics Calculator
// Description: Aggregate reduction over a synthetic metric series.
// Purpose: Derive percentiles, means, extremes, and totals for lab responses.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Summary statistics are a derived, non-authoritative reduction of a metric
//! series. Percentiles are taken at floor-of-rank positions from a single
//! sorted copy of the latency values, so `p50 <= p90 <= p95 <= p99` holds by
//! construction. The series is always non-empty, so no division guard is
//! needed beyond construction-time invariants.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::metrics::series::MetricSample;
use crate::metrics::series::round1;
use crate::metrics::series::round_to_u32;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Latency percentiles taken from a sorted copy of the series.
///
/// # Invariants
/// - `p50 <= p90 <= p95 <= p99`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LatencyPercentiles {
    /// 50th percentile latency in milliseconds.
    pub p50: u32,
    /// 90th percentile latency in milliseconds.
    pub p90: u32,
    /// 95th percentile latency in milliseconds.
    pub p95: u32,
    /// 99th percentile latency in milliseconds.
    pub p99: u32,
}

/// Aggregate figures derived from a metric series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    /// Estimated total requests: mean throughput times duration.
    #[serde(rename = "totalRequests")]
    pub total_requests: u64,
    /// Mean latency in whole milliseconds.
    #[serde(rename = "averageResponseTime")]
    pub average_latency_ms: u32,
    /// Maximum sample latency in milliseconds.
    #[serde(rename = "maxResponseTime")]
    pub max_latency_ms: u32,
    /// Minimum sample latency in milliseconds.
    #[serde(rename = "minResponseTime")]
    pub min_latency_ms: u32,
    /// Mean throughput in requests per second, one decimal place.
    #[serde(rename = "averageRPS")]
    pub average_rps: f64,
    /// Maximum sample throughput in requests per second.
    #[serde(rename = "maxRPS")]
    pub max_rps: f64,
    /// Estimated total errors over the run.
    #[serde(rename = "totalErrors")]
    pub total_errors: u64,
    /// Mean error rate as a percentage, one decimal place.
    #[serde(rename = "averageErrorRate")]
    pub average_error_rate_pct: f64,
    /// Latency percentiles.
    pub percentiles: LatencyPercentiles,
}

// ============================================================================
// SECTION: Reduction
// ============================================================================

/// Reduces a metric series to summary statistics.
///
/// The series is expected to be non-empty; an empty input yields all-zero
/// statistics rather than a panic.
#[must_use]
pub fn summarize(samples: &[MetricSample], duration_secs: u32) -> SummaryStatistics {
    let count = samples.len();
    if count == 0 {
        return SummaryStatistics {
            total_requests: 0,
            average_latency_ms: 0,
            max_latency_ms: 0,
            min_latency_ms: 0,
            average_rps: 0.0,
            max_rps: 0.0,
            total_errors: 0,
            average_error_rate_pct: 0.0,
            percentiles: LatencyPercentiles {
                p50: 0,
                p90: 0,
                p95: 0,
                p99: 0,
            },
        };
    }

    let mut latencies: Vec<u32> = samples.iter().map(|s| s.latency_ms).collect();
    latencies.sort_unstable();

    let latency_sum: u64 = latencies.iter().map(|v| u64::from(*v)).sum();
    let rps_sum: f64 = samples.iter().map(|s| s.throughput_rps).sum();
    let error_pct_sum: f64 = samples.iter().map(|s| s.error_rate_pct).sum();

    #[allow(
        clippy::cast_precision_loss,
        reason = "Series length is capped at sixty samples."
    )]
    let count_f = count as f64;

    SummaryStatistics {
        total_requests: u64::from(round_to_u32(rps_sum * f64::from(duration_secs) / count_f)),
        average_latency_ms: round_to_u32(latency_sum as f64 / count_f),
        max_latency_ms: latencies.last().copied().unwrap_or(0),
        min_latency_ms: latencies.first().copied().unwrap_or(0),
        average_rps: round1(rps_sum / count_f),
        max_rps: samples.iter().map(|s| s.throughput_rps).fold(0.0, f64::max),
        total_errors: u64::from(round_to_u32(error_pct_sum / 10.0)),
        average_error_rate_pct: round1(error_pct_sum / count_f),
        percentiles: percentiles_of(&latencies),
    }
}

/// Selects floor-of-rank percentiles from a sorted latency list.
fn percentiles_of(sorted: &[u32]) -> LatencyPercentiles {
    LatencyPercentiles {
        p50: rank(sorted, 0.50),
        p90: rank(sorted, 0.90),
        p95: rank(sorted, 0.95),
        p99: rank(sorted, 0.99),
    }
}

/// Returns the value at `floor(len * fraction)` in a sorted list.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "Fractions are below one, so the floored index stays in range."
)]
fn rank(sorted: &[u32], fraction: f64) -> u32 {
    let index = ((sorted.len() as f64) * fraction).floor() as usize;
    sorted.get(index).copied().unwrap_or_else(|| sorted.last().copied().unwrap_or(0))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
