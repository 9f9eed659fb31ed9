// crates/testlab-core/src/script.rs
// ============================================================================
// Module: Scenario Script Emit
// Description: Textual k6-syntax load script rendering.
// Purpose: Mirror the generated test shape as a runnable-looking script.
// Dependencies: none beyond std
// ============================================================================

//! ## Overview
//! Renders a k6-syntax load script whose staging mirrors the shape used by the
//! metric generator: a flat stage for steady runs and timed ramp stages for
//! escalating and burst runs. Pure templating; nothing here is ever executed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write;

use crate::plan::TestPlan;
use crate::plan::TestShape;

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders the load script for a plan.
///
/// Burst plans always include a peak stage targeting five times the
/// configured concurrency.
#[must_use]
pub fn render_script(plan: &TestPlan) -> String {
    let mut script = String::from(
        "import http from 'k6/http';\nimport { check, sleep } from 'k6';\n\nexport let options = {",
    );
    let _ = write!(script, "{}", render_options(plan));
    let _ = write!(
        script,
        "\n}};\n\nexport default function() {{\n  let response = http.get('{}');\n\n  check(response, {{\n    'status is 200': (r) => r.status === 200,\n    'response time < 500ms': (r) => r.timings.duration < 500,\n  }});\n\n  sleep(1);\n}}",
        plan.target_url
    );
    script
}

/// Renders the shape-specific options block body.
fn render_options(plan: &TestPlan) -> String {
    let vus = plan.virtual_users;
    let duration = plan.duration_secs;
    match plan.shape {
        TestShape::Steady => {
            format!("\n  vus: {vus},\n  duration: '{duration}s',")
        }
        TestShape::Escalating => {
            let stage = div_round(duration, 3);
            format!(
                "\n  stages: [\n    {{ duration: '{stage}s', target: {vus} }},\n    {{ duration: '{stage}s', target: {} }},\n    {{ duration: '{stage}s', target: 0 }},\n  ],",
                vus * 2
            )
        }
        TestShape::Burst => {
            let ramp = pct_round(duration, 10);
            let surge = pct_round(duration, 20);
            let hold = pct_round(duration, 40);
            format!(
                "\n  stages: [\n    {{ duration: '{ramp}s', target: {vus} }},\n    {{ duration: '{surge}s', target: {} }},\n    {{ duration: '{hold}s', target: {vus} }},\n    {{ duration: '{surge}s', target: {} }},\n    {{ duration: '{ramp}s', target: 0 }},\n  ],",
                vus * 5,
                vus * 3
            )
        }
    }
}

/// Integer division rounded to the nearest whole number.
const fn div_round(value: u32, divisor: u32) -> u32 {
    (value + divisor / 2) / divisor
}

/// Rounded percentage of a whole-second duration.
const fn pct_round(value: u32, percent: u32) -> u32 {
    (value * percent + 50) / 100
}

// ============================================================================
// SECTION: Tests
// ============================================================================
