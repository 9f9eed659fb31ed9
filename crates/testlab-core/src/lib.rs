// crates/testlab-core/src/lib.rs
// ============================================================================
// Module: testlab Core
// Description: Pure domain logic for the simulated testing labs.
// Purpose: Generate, reduce, and judge synthetic test results without I/O.
// Dependencies: rand, serde, thiserror
// ============================================================================

//! ## Overview
//! testlab-core holds every pure computation behind the lab endpoints: test
//! shapes and plans, the synthetic metric series generator, summary
//! statistics, the heuristic assessor, scenario script templating, the
//! declarative browser scenario catalog, and security-scan synthesis. The
//! core never reads wall-clock time and never draws ambient randomness;
//! callers pass timestamps and a random source explicitly so tests can pin
//! exact outputs.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod assess;
pub mod metrics;
pub mod plan;
pub mod scan;
pub mod scenario;
pub mod script;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use assess::Assessment;
pub use assess::PerformanceRating;
pub use assess::assess;
pub use metrics::series::MetricSample;
pub use metrics::series::generate_series;
pub use metrics::summary::LatencyPercentiles;
pub use metrics::summary::SummaryStatistics;
pub use metrics::summary::summarize;
pub use plan::DEFAULT_DURATION_SECS;
pub use plan::DEFAULT_VIRTUAL_USERS;
pub use plan::MAX_SERIES_POINTS;
pub use plan::TestPlan;
pub use plan::TestShape;
pub use plan::UnknownShapeError;
pub use scan::ScanType;
pub use scenario::BrowserAction;
pub use scenario::ScenarioKind;
pub use scenario::ScenarioStep;
pub use scenario::script_for;
pub use script::render_script;
