// crates/testlab-core/tests/proptest_series.rs
// ============================================================================
// Module: Series Property-Based Tests
// Description: Property tests for generator clamping and summary invariants.
// Purpose: Detect invariant violations across wide input ranges.
// ============================================================================

//! Property-based tests for the metric generator and summary calculator.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use testlab_core::TestPlan;
use testlab_core::TestShape;
use testlab_core::generate_series;
use testlab_core::summarize;

fn shape_strategy() -> impl Strategy<Value = TestShape> {
    prop_oneof![
        Just(TestShape::Steady),
        Just(TestShape::Escalating),
        Just(TestShape::Burst),
    ]
}

proptest! {
    #[test]
    fn series_length_matches_min_of_duration_and_cap(
        shape in shape_strategy(),
        vus in 1_u32..500,
        duration in 1_u32..3_600,
        seed in any::<u64>(),
    ) {
        let plan = TestPlan::new(shape, "https://example.com", Some(vus), Some(duration));
        let mut rng = StdRng::seed_from_u64(seed);
        let series = generate_series(&plan, 0, &mut rng);
        prop_assert_eq!(u32::try_from(series.len()).unwrap(), duration.min(60));
        prop_assert!(!series.is_empty());
    }

    #[test]
    fn samples_never_violate_clamps(
        shape in shape_strategy(),
        vus in 1_u32..500,
        duration in 1_u32..600,
        seed in any::<u64>(),
    ) {
        let plan = TestPlan::new(shape, "https://example.com", Some(vus), Some(duration));
        let mut rng = StdRng::seed_from_u64(seed);
        for sample in generate_series(&plan, 0, &mut rng) {
            prop_assert!(sample.latency_ms >= 50);
            prop_assert!(sample.throughput_rps >= 0.0);
            prop_assert!(sample.error_rate_pct >= 0.0);
            prop_assert!(sample.error_rate_pct <= 100.0);
        }
    }

    #[test]
    fn percentiles_are_monotone(
        shape in shape_strategy(),
        vus in 1_u32..200,
        duration in 1_u32..300,
        seed in any::<u64>(),
    ) {
        let plan = TestPlan::new(shape, "https://example.com", Some(vus), Some(duration));
        let mut rng = StdRng::seed_from_u64(seed);
        let series = generate_series(&plan, 0, &mut rng);
        let stats = summarize(&series, plan.duration_secs);
        prop_assert!(stats.percentiles.p50 <= stats.percentiles.p90);
        prop_assert!(stats.percentiles.p90 <= stats.percentiles.p95);
        prop_assert!(stats.percentiles.p95 <= stats.percentiles.p99);
        prop_assert!(stats.min_latency_ms <= stats.average_latency_ms);
        prop_assert!(stats.average_latency_ms <= stats.max_latency_ms);
    }

    #[test]
    fn seeded_generation_is_reproducible(
        shape in shape_strategy(),
        seed in any::<u64>(),
    ) {
        let plan = TestPlan::new(shape, "https://example.com", Some(20), Some(45));
        let first = generate_series(&plan, 500, &mut StdRng::seed_from_u64(seed));
        let second = generate_series(&plan, 500, &mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(first, second);
    }
}
