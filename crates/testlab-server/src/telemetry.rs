// crates/testlab-server/src/telemetry.rs
// ============================================================================
// Module: Lab Telemetry
// Description: Observability hooks for lab request handling.
// Purpose: Provide metric events and latency buckets without hard deps.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module exposes a thin metrics interface for lab request counters and
//! latency histograms. It is intentionally dependency-light so deployments can
//! plug in Prometheus or OpenTelemetry without redesign.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default latency buckets in milliseconds for lab request histograms.
pub const LAB_LATENCY_BUCKETS_MS: &[u64] =
    &[1, 2, 5, 10, 25, 50, 100, 250, 500, 1_000, 2_500, 5_000, 10_000, 30_000];

// ============================================================================
// SECTION: Metric Labels
// ============================================================================

/// Lab endpoint classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum LabKind {
    /// Synthetic load test lab.
    Performance,
    /// Browser scenario lab.
    Browser,
    /// Security scan lab.
    SecurityScan,
    /// Live API probe lab.
    Api,
}

impl LabKind {
    /// Returns a stable label for the lab.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Performance => "run-performance-test",
            Self::Browser => "run-test",
            Self::SecurityScan => "security-scan",
            Self::Api => "test-api",
        }
    }
}

/// Lab request outcome classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum LabOutcome {
    /// Successful request.
    Ok,
    /// Failed request.
    Error,
}

impl LabOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
        }
    }
}

/// Lab request metric event payload.
///
/// # Invariants
/// - `error_kind` is `None` for successful requests.
#[derive(Debug, Clone)]
pub struct LabMetricEvent {
    /// Lab that handled the request.
    pub lab: LabKind,
    /// Request outcome.
    pub outcome: LabOutcome,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Request body size in bytes.
    pub request_bytes: usize,
    /// Response body size in bytes.
    pub response_bytes: usize,
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Metrics sink for lab requests and latencies.
pub trait LabMetrics: Send + Sync {
    /// Records a request counter event.
    fn record_request(&self, event: LabMetricEvent);
    /// Records a latency observation for the request.
    fn record_latency(&self, event: LabMetricEvent, latency: Duration);
}

/// No-op metrics sink.
///
/// # Invariants
/// - Metrics are intentionally discarded.
pub struct NoopMetrics;

impl LabMetrics for NoopMetrics {
    fn record_request(&self, _event: LabMetricEvent) {}

    fn record_latency(&self, _event: LabMetricEvent, _latency: Duration) {}
}
