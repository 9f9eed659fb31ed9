// crates/testlab-server/src/lib.rs
// ============================================================================
// Module: testlab Server
// Description: HTTP surface for the simulated testing labs.
// Purpose: Expose the lab pipeline as four JSON-over-HTTP endpoints.
// Dependencies: axum, testlab-core, testlab-config, testlab-probe, tokio
// ============================================================================

//! ## Overview
//! testlab-server wires the pure core pipeline and the outbound probes into
//! four POST endpoints. Handlers validate input, run the lab, and wrap every
//! failure in a uniform HTTP 500 envelope with troubleshooting hints; no
//! exception-style propagation crosses the handler boundary. Observability is
//! dependency-light: a JSON-line audit sink and a pluggable metrics trait.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
mod clock;
mod envelope;
mod labs;
pub mod server;
pub mod telemetry;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::LabAuditEvent;
pub use audit::LabAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use server::ServerError;
pub use server::TestLabServer;
pub use telemetry::LAB_LATENCY_BUCKETS_MS;
pub use telemetry::LabKind;
pub use telemetry::LabMetricEvent;
pub use telemetry::LabMetrics;
pub use telemetry::LabOutcome;
pub use telemetry::NoopMetrics;
