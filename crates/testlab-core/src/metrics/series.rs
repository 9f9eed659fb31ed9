// crates/testlab-core/src/metrics/series.rs
// ============================================================================
// Module: Metric Series Generator
// Description: Shape-driven synthetic performance sample generation.
// Purpose: Fabricate bounded, time-ascending metric series for lab responses.
// Dependencies: rand, serde
// ============================================================================

//! ## Overview
//! Each test shape defines a base latency, a base error rate, and a
//! time-dependent perturbation. Every sample then receives small uniform
//! jitter and is clamped to valid ranges, so the generated series is plausible
//! but never violates its bounds. The random source is an explicit parameter;
//! there is no ambient randomness.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::f64::consts::PI;
use std::f64::consts::TAU;

use rand::Rng;
use serde::Serialize;

use crate::plan::TestPlan;
use crate::plan::TestShape;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Lower bound applied to every generated latency value, in milliseconds.
pub const MIN_LATENCY_MS: f64 = 50.0;
/// Half-width of the uniform latency jitter, in milliseconds.
const LATENCY_JITTER_MS: f64 = 25.0;
/// Half-width of the uniform throughput jitter, in requests per second.
const THROUGHPUT_JITTER_RPS: f64 = 2.5;
/// Half-width of the uniform error-rate jitter, as a fraction.
const ERROR_RATE_JITTER: f64 = 0.005;
/// Latency swing added by the burst shape at its sinusoidal peak.
const BURST_LATENCY_SWING_MS: f64 = 200.0;
/// Fraction of the duration after which the escalating shape degrades.
const ESCALATION_ONSET: f64 = 0.7;

// ============================================================================
// SECTION: Metric Sample
// ============================================================================

/// One synthetic data point in a generated performance time series.
///
/// # Invariants
/// - `latency_ms` >= [`MIN_LATENCY_MS`], `throughput_rps` >= 0,
///   `error_rate_pct` within [0, 100].
/// - Samples are immutable once produced and ordered by elapsed time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSample {
    /// Wall-clock timestamp of the sample, in unix milliseconds.
    #[serde(rename = "timestamp")]
    pub timestamp_ms: i64,
    /// Elapsed offset from the start of the run, in seconds.
    #[serde(rename = "time")]
    pub elapsed_secs: f64,
    /// Simulated response latency, rounded to whole milliseconds.
    #[serde(rename = "responseTime")]
    pub latency_ms: u32,
    /// Simulated throughput in requests per second, one decimal place.
    #[serde(rename = "rps")]
    pub throughput_rps: f64,
    /// Simulated error rate as a percentage, one decimal place.
    #[serde(rename = "errorRate")]
    pub error_rate_pct: f64,
    /// Concurrency in effect when the sample was taken.
    #[serde(rename = "virtualUsers")]
    pub virtual_users: u32,
}

// ============================================================================
// SECTION: Shape Profiles
// ============================================================================

/// Per-run base values drawn once before sample generation.
struct ShapeProfile {
    /// Base latency for the run, in milliseconds.
    base_latency_ms: f64,
    /// Base error rate for the run, as a fraction.
    base_error_rate: f64,
}

impl ShapeProfile {
    /// Draws the run's base values for the given shape.
    fn draw<R: Rng + ?Sized>(shape: TestShape, rng: &mut R) -> Self {
        match shape {
            TestShape::Steady => Self {
                base_latency_ms: 150.0 + rng.gen_range(0.0..100.0),
                base_error_rate: 0.005,
            },
            TestShape::Escalating => Self {
                base_latency_ms: 300.0 + rng.gen_range(0.0..200.0),
                base_error_rate: 0.02,
            },
            TestShape::Burst => Self {
                base_latency_ms: 250.0 + rng.gen_range(0.0..300.0),
                base_error_rate: 0.015,
            },
        }
    }
}

// ============================================================================
// SECTION: Generation
// ============================================================================

/// Generates the synthetic metric series for a plan.
///
/// Produces `min(duration, 60)` samples evenly spaced across the requested
/// duration. Always succeeds for a constructed plan; the output is a pure
/// function of the plan, the start timestamp, and the random source.
#[must_use]
pub fn generate_series<R: Rng + ?Sized>(
    plan: &TestPlan,
    start_ms: i64,
    rng: &mut R,
) -> Vec<MetricSample> {
    let points = plan.sample_count();
    let duration = f64::from(plan.duration_secs);
    let interval_ms = i64::from(plan.duration_secs) * 1000 / i64::from(points);
    let profile = ShapeProfile::draw(plan.shape, rng);
    let base_rps = f64::from(plan.virtual_users) * 2.0;

    let mut samples = Vec::with_capacity(points as usize);
    for index in 0..points {
        let elapsed = f64::from(index) * duration / f64::from(points);
        let frac = elapsed / duration;

        let mut latency = profile.base_latency_ms;
        let mut rps = base_rps;
        let mut error_rate = profile.base_error_rate;

        match plan.shape {
            TestShape::Steady => {}
            TestShape::Escalating => {
                if elapsed > duration * ESCALATION_ONSET {
                    latency *= 1.0 + frac * 2.0;
                    error_rate *= 3.0;
                }
            }
            TestShape::Burst => {
                let phase = (frac * TAU).sin();
                latency += phase * BURST_LATENCY_SWING_MS;
                rps += phase * f64::from(plan.virtual_users);
            }
        }

        latency += rng.gen_range(-LATENCY_JITTER_MS..LATENCY_JITTER_MS);
        rps += rng.gen_range(-THROUGHPUT_JITTER_RPS..THROUGHPUT_JITTER_RPS);
        error_rate += rng.gen_range(-ERROR_RATE_JITTER..ERROR_RATE_JITTER);

        latency = latency.max(MIN_LATENCY_MS);
        rps = rps.max(0.0);
        error_rate = error_rate.clamp(0.0, 1.0);

        let virtual_users = match plan.shape {
            TestShape::Burst => {
                round_to_u32(f64::from(plan.virtual_users) * (1.0 + (frac * PI).sin() * 0.5))
            }
            TestShape::Steady | TestShape::Escalating => plan.virtual_users,
        };

        samples.push(MetricSample {
            timestamp_ms: start_ms + i64::from(index) * interval_ms,
            elapsed_secs: elapsed,
            latency_ms: round_to_u32(latency),
            throughput_rps: round1(rps),
            error_rate_pct: (error_rate * 1000.0).round() / 10.0,
            virtual_users,
        });
    }
    samples
}

/// Rounds to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Rounds a non-negative metric value to the nearest whole number.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "Inputs are clamped to non-negative, bounded metric ranges."
)]
pub(crate) fn round_to_u32(value: f64) -> u32 {
    value.round().max(0.0) as u32
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

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::MIN_LATENCY_MS;
    use super::generate_series;
    use crate::plan::TestPlan;
    use crate::plan::TestShape;

    fn plan(shape: TestShape, duration: u32) -> TestPlan {
        TestPlan::new(shape, "https://example.com", Some(10), Some(duration))
    }

    #[test]
    fn series_length_is_min_of_duration_and_sixty() {
        let mut rng = StdRng::seed_from_u64(7);
        for shape in [TestShape::Steady, TestShape::Escalating, TestShape::Burst] {
            assert_eq!(generate_series(&plan(shape, 30), 0, &mut rng).len(), 30);
            assert_eq!(generate_series(&plan(shape, 61), 0, &mut rng).len(), 60);
            assert_eq!(generate_series(&plan(shape, 1), 0, &mut rng).len(), 1);
        }
    }

    #[test]
    fn samples_respect_clamping_bounds() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            for shape in [TestShape::Steady, TestShape::Escalating, TestShape::Burst] {
                for sample in generate_series(&plan(shape, 60), 0, &mut rng) {
                    assert!(f64::from(sample.latency_ms) >= MIN_LATENCY_MS);
                    assert!(sample.throughput_rps >= 0.0);
                    assert!(sample.error_rate_pct >= 0.0);
                    assert!(sample.error_rate_pct <= 100.0);
                }
            }
        }
    }

    #[test]
    fn samples_are_time_ascending_and_evenly_spaced() {
        let mut rng = StdRng::seed_from_u64(11);
        let samples = generate_series(&plan(TestShape::Steady, 120), 1_000, &mut rng);
        let spacing = samples[1].timestamp_ms - samples[0].timestamp_ms;
        assert_eq!(spacing, 2_000);
        for pair in samples.windows(2) {
            assert_eq!(pair[1].timestamp_ms - pair[0].timestamp_ms, spacing);
            assert!(pair[1].elapsed_secs > pair[0].elapsed_secs);
        }
    }

    #[test]
    fn escalating_shape_degrades_the_tail() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let samples = generate_series(&plan(TestShape::Escalating, 60), 0, &mut rng);
            let third = samples.len() * 3 / 10;
            let head: f64 =
                samples[..third].iter().map(|s| f64::from(s.latency_ms)).sum::<f64>() / third as f64;
            let tail_slice = &samples[samples.len() - third..];
            let tail: f64 = tail_slice.iter().map(|s| f64::from(s.latency_ms)).sum::<f64>()
                / tail_slice.len() as f64;
            assert!(tail > head, "tail {tail} must exceed head {head}");
        }
    }

    #[test]
    fn burst_shape_modulates_concurrency() {
        let mut rng = StdRng::seed_from_u64(3);
        let samples = generate_series(&plan(TestShape::Burst, 60), 0, &mut rng);
        let peak = samples.iter().map(|s| s.virtual_users).max().unwrap();
        assert!(peak > 10, "peak concurrency {peak} should exceed the configured level");
        let steady = generate_series(&plan(TestShape::Steady, 60), 0, &mut rng);
        assert!(steady.iter().all(|s| s.virtual_users == 10));
    }
}
