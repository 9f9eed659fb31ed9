// crates/testlab-probe/src/lib.rs
// ============================================================================
// Module: testlab Probe
// Description: Outbound HTTP probes and the browser scenario runner.
// Purpose: Keep every network and driver interaction behind narrow seams.
// Dependencies: async-trait, base64, reqwest, serde, url
// ============================================================================

//! ## Overview
//! testlab-probe holds everything that leaves the process: the single
//! security-header HEAD fetch for the scan lab, the live request executor for
//! the API lab, and the generic browser scenario runner. Each probe performs
//! exactly one outbound call per request with a fixed timeout and no retries;
//! a failure is recorded and reported, never retried.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod api;
pub mod browser;
pub mod headers;
mod target;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use api::ApiExchange;
pub use api::ApiProbe;
pub use api::ApiRequestSpec;
pub use api::ResponseAnalysis;
pub use api::analyze_exchange;
pub use browser::BrowserDriver;
pub use browser::BrowserError;
pub use browser::ScenarioOutcome;
pub use browser::ScriptedBrowser;
pub use browser::StepRecord;
pub use browser::run_scenario;
pub use headers::HeaderProbe;
pub use target::ProbeError;
pub use target::parse_target_url;
