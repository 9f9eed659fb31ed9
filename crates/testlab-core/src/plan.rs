// crates/testlab-core/src/plan.rs
// ============================================================================
// Module: Test Plans
// Description: Test shape enumeration and per-request plan values.
// Purpose: Provide strongly typed, coerced inputs for the metric generator.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A [`TestPlan`] is the immutable, request-scoped input to the synthetic
//! metric generator. Shapes are a closed enumeration with stable wire names so
//! adding a shape is an exhaustiveness concern, not a string comparison.
//! Absent or non-positive numeric inputs are coerced to safe defaults at
//! construction; callers clamp to deployment ceilings before construction.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum number of samples in a generated series, regardless of duration.
pub const MAX_SERIES_POINTS: u32 = 60;
/// Default virtual user count when the request omits or mangles the field.
pub const DEFAULT_VIRTUAL_USERS: u32 = 10;
/// Default test duration in seconds when the request omits or mangles the field.
pub const DEFAULT_DURATION_SECS: u32 = 30;

// ============================================================================
// SECTION: Test Shape
// ============================================================================

/// Named pattern governing how synthetic metrics evolve over a test run.
///
/// # Invariants
/// - Wire names are stable: `steady`, `escalating`, `burst`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestShape {
    /// Flat load at the configured concurrency for the whole duration.
    Steady,
    /// Sustained load that degrades latency and error rate near the end.
    Escalating,
    /// Sinusoidal spike-then-recovery pattern over one full period.
    Burst,
}

impl TestShape {
    /// Returns the stable wire name for the shape.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Steady => "steady",
            Self::Escalating => "escalating",
            Self::Burst => "burst",
        }
    }

    /// Parses a wire name into a shape.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownShapeError`] when the name is not a known shape.
    pub fn from_wire(name: &str) -> Result<Self, UnknownShapeError> {
        match name {
            "steady" => Ok(Self::Steady),
            "escalating" => Ok(Self::Escalating),
            "burst" => Ok(Self::Burst),
            _ => Err(UnknownShapeError {
                name: name.to_string(),
            }),
        }
    }
}

/// Error returned when a wire name does not match any test shape.
#[derive(Debug, Error)]
#[error("unknown test shape: {name}")]
pub struct UnknownShapeError {
    /// The rejected wire name.
    pub name: String,
}

// ============================================================================
// SECTION: Test Plan
// ============================================================================

/// Immutable per-request test configuration.
///
/// # Invariants
/// - `virtual_users` and `duration_secs` are always >= 1 after construction.
/// - `target_url` is an opaque string; most shapes never dereference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestPlan {
    /// Shape of the synthetic run.
    pub shape: TestShape,
    /// Target identifier echoed into responses and scripts.
    pub target_url: String,
    /// Configured concurrency level.
    pub virtual_users: u32,
    /// Requested duration in seconds.
    pub duration_secs: u32,
}

impl TestPlan {
    /// Builds a plan, coercing absent or non-positive values to defaults.
    #[must_use]
    pub fn new(
        shape: TestShape,
        target_url: impl Into<String>,
        virtual_users: Option<u32>,
        duration_secs: Option<u32>,
    ) -> Self {
        Self {
            shape,
            target_url: target_url.into(),
            virtual_users: coerce_positive(virtual_users, DEFAULT_VIRTUAL_USERS),
            duration_secs: coerce_positive(duration_secs, DEFAULT_DURATION_SECS),
        }
    }

    /// Number of samples the generator will produce for this plan.
    ///
    /// Always >= 1 because `duration_secs` is >= 1.
    #[must_use]
    pub const fn sample_count(&self) -> u32 {
        if self.duration_secs < MAX_SERIES_POINTS {
            self.duration_secs
        } else {
            MAX_SERIES_POINTS
        }
    }
}

/// Replaces absent or zero values with a positive default.
const fn coerce_positive(value: Option<u32>, default: u32) -> u32 {
    match value {
        Some(value) if value > 0 => value,
        _ => default,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
