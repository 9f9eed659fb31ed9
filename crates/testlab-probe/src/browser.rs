// crates/testlab-probe/src/browser.rs
// ============================================================================
// Module: Browser Scenario Runner
// Description: Generic interpreter for declarative browser scenarios.
// Purpose: Run fixed action scripts against any driver with one cleanup path.
// Dependencies: async-trait, base64, serde, testlab-core
// ============================================================================

//! ## Overview
//! The runner interprets a scenario's declarative steps against a
//! [`BrowserDriver`]. A step failure is caught, recorded as a failed entry in
//! the ordered step log, and stops further steps; it never aborts the
//! response. A final screenshot is always attempted and the driver is closed
//! on both success and failure paths. Nothing is retried.
//!
//! The bundled [`ScriptedBrowser`] simulates the fixed walks deterministically
//! so the lab works without a real browser; a real driver implements the same
//! trait.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::time::Instant;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use testlab_core::BrowserAction;
use testlab_core::ScenarioKind;
use testlab_core::ScenarioStep;
use testlab_core::script_for;
use thiserror::Error;

// ============================================================================
// SECTION: Driver Seam
// ============================================================================

/// Driver errors surfaced into the step log.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// An action ran before any page was loaded.
    #[error("no page loaded")]
    NoPage,
    /// A selector did not match any element.
    #[error("element not found: {0}")]
    MissingElement(String),
    /// An element matched but was not visible.
    #[error("element not visible: {0}")]
    NotVisible(String),
    /// A field value did not match the asserted expectation.
    #[error("unexpected value in {selector}: {actual}")]
    UnexpectedValue {
        /// Selector of the mismatched field.
        selector: String,
        /// Value actually read.
        actual: String,
    },
    /// Any other driver failure.
    #[error("driver error: {0}")]
    Driver(String),
}

/// Minimal driver surface the scenario runner needs.
///
/// Implementations are scoped to a single request and released via
/// [`BrowserDriver::close`] before the response is returned.
#[async_trait]
pub trait BrowserDriver: Send {
    /// Loads a page.
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;
    /// Types a value into a form field.
    async fn fill(&mut self, selector: &str, value: &str) -> Result<(), BrowserError>;
    /// Chooses an option in a select element.
    async fn select(&mut self, selector: &str, value: &str) -> Result<(), BrowserError>;
    /// Presses a keyboard key.
    async fn press(&mut self, key: &str) -> Result<(), BrowserError>;
    /// Returns whether an element is present and visible.
    async fn is_visible(&mut self, selector: &str) -> Result<bool, BrowserError>;
    /// Reads a form field value.
    async fn value_of(&mut self, selector: &str) -> Result<String, BrowserError>;
    /// Reads the page title.
    async fn title(&mut self) -> Result<String, BrowserError>;
    /// Reads the text content of an element.
    async fn text_of(&mut self, selector: &str) -> Result<String, BrowserError>;
    /// Captures a PNG screenshot of the current page.
    async fn screenshot(&mut self) -> Result<Vec<u8>, BrowserError>;
    /// Releases the page and driver resources.
    async fn close(&mut self) -> Result<(), BrowserError>;
}

// ============================================================================
// SECTION: Step Log
// ============================================================================

/// Outcome of one recorded step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// The step's actions all completed.
    Passed,
    /// An action failed; the failure detail is in the description.
    Failed,
}

/// One entry in the ordered step log.
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    /// One-based step ordinal.
    pub step: u32,
    /// Short action label.
    pub action: String,
    /// Step description, or the failure detail for failed steps.
    pub description: String,
    /// Elapsed milliseconds from scenario start.
    #[serde(rename = "timestamp")]
    pub elapsed_ms: u64,
    /// Step outcome.
    pub status: StepStatus,
}

/// Result of one scenario run.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    /// Scenario that ran.
    #[serde(rename = "testType")]
    pub kind: ScenarioKind,
    /// Whether every step passed.
    pub success: bool,
    /// Ordered step log.
    pub steps: Vec<StepRecord>,
    /// First failure detail, when any step failed.
    pub error: Option<String>,
    /// Final screenshot as a PNG data URI, when capture succeeded.
    pub screenshot: Option<String>,
    /// Total wall-clock duration in milliseconds.
    #[serde(rename = "duration")]
    pub duration_ms: u64,
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Runs a scenario's declarative steps against a driver.
///
/// A failed step is recorded and stops further steps. The final screenshot is
/// attempted and the driver is closed on both paths before returning.
pub async fn run_scenario<D: BrowserDriver>(driver: &mut D, kind: ScenarioKind) -> ScenarioOutcome {
    let started = Instant::now();
    let script = script_for(kind);
    let mut steps = Vec::with_capacity(script.len());
    let mut error = None;

    for (index, step) in script.iter().enumerate() {
        let ordinal = to_ordinal(index);
        match execute_step(driver, step).await {
            Ok(()) => steps.push(StepRecord {
                step: ordinal,
                action: step.label.to_string(),
                description: step.description.to_string(),
                elapsed_ms: elapsed_ms(started),
                status: StepStatus::Passed,
            }),
            Err(err) => {
                let detail = err.to_string();
                steps.push(StepRecord {
                    step: ordinal,
                    action: step.label.to_string(),
                    description: detail.clone(),
                    elapsed_ms: elapsed_ms(started),
                    status: StepStatus::Failed,
                });
                error = Some(detail);
                break;
            }
        }
    }

    let screenshot = driver
        .screenshot()
        .await
        .ok()
        .map(|bytes| format!("data:image/png;base64,{}", STANDARD.encode(bytes)));
    let _ = driver.close().await;

    ScenarioOutcome {
        kind,
        success: error.is_none(),
        steps,
        error,
        screenshot,
        duration_ms: elapsed_ms(started),
    }
}

/// Executes every action of one step, failing fast on the first error.
async fn execute_step<D: BrowserDriver>(
    driver: &mut D,
    step: &ScenarioStep,
) -> Result<(), BrowserError> {
    for action in step.actions {
        apply_action(driver, *action).await?;
    }
    Ok(())
}

/// Applies one declarative action to the driver.
async fn apply_action<D: BrowserDriver>(
    driver: &mut D,
    action: BrowserAction,
) -> Result<(), BrowserError> {
    match action {
        BrowserAction::Navigate {
            url,
        } => driver.navigate(url).await,
        BrowserAction::Fill {
            selector,
            value,
        } => driver.fill(selector, value).await,
        BrowserAction::Select {
            selector,
            value,
        } => driver.select(selector, value).await,
        BrowserAction::Press {
            key,
        } => driver.press(key).await,
        BrowserAction::AssertVisible {
            selector,
        } => {
            if driver.is_visible(selector).await? {
                Ok(())
            } else {
                Err(BrowserError::NotVisible(selector.to_string()))
            }
        }
        BrowserAction::ReadValue {
            selector,
            expected,
        } => {
            let actual = driver.value_of(selector).await?;
            if actual == expected {
                Ok(())
            } else {
                Err(BrowserError::UnexpectedValue {
                    selector: selector.to_string(),
                    actual,
                })
            }
        }
        BrowserAction::ReadTitle => driver.title().await.map(|_| ()),
        BrowserAction::ReadText {
            selector,
        } => driver.text_of(selector).await.map(|_| ()),
    }
}

/// One-based step ordinal from a zero-based index.
#[allow(clippy::cast_possible_truncation, reason = "Scenario scripts have single-digit lengths.")]
const fn to_ordinal(index: usize) -> u32 {
    index as u32 + 1
}

/// Elapsed milliseconds since an instant, saturating.
fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

// ============================================================================
// SECTION: Scripted Driver
// ============================================================================

/// Placeholder PNG returned by the scripted driver's screenshot call.
const PLACEHOLDER_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90,
    0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x38,
    0x73, 0xE6, 0x0C, 0x00, 0x04, 0xCC, 0x02, 0x65, 0x39, 0x9A, 0x65, 0x2C, 0x00, 0x00, 0x00,
    0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Deterministic in-process driver simulating the fixed demo walks.
///
/// # Invariants
/// - Field state is scoped to the currently loaded page.
/// - Every call before the first navigation fails with [`BrowserError::NoPage`].
#[derive(Debug, Default)]
pub struct ScriptedBrowser {
    /// Currently loaded page, when any.
    page: Option<PageState>,
}

/// Simulated page state.
#[derive(Debug)]
struct PageState {
    /// URL of the loaded page.
    url: String,
    /// Field values typed so far, keyed by selector.
    fields: BTreeMap<String, String>,
}

impl ScriptedBrowser {
    /// Creates a driver with no page loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the loaded page or the no-page error.
    fn page_mut(&mut self) -> Result<&mut PageState, BrowserError> {
        self.page.as_mut().ok_or(BrowserError::NoPage)
    }
}

#[async_trait]
impl BrowserDriver for ScriptedBrowser {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.page = Some(PageState {
            url: url.to_string(),
            fields: BTreeMap::new(),
        });
        Ok(())
    }

    async fn fill(&mut self, selector: &str, value: &str) -> Result<(), BrowserError> {
        let page = self.page_mut()?;
        page.fields.insert(selector.to_string(), value.to_string());
        Ok(())
    }

    async fn select(&mut self, selector: &str, value: &str) -> Result<(), BrowserError> {
        self.fill(selector, value).await
    }

    async fn press(&mut self, _key: &str) -> Result<(), BrowserError> {
        self.page_mut().map(|_| ())
    }

    async fn is_visible(&mut self, _selector: &str) -> Result<bool, BrowserError> {
        self.page_mut().map(|_| true)
    }

    async fn value_of(&mut self, selector: &str) -> Result<String, BrowserError> {
        let page = self.page_mut()?;
        page.fields
            .get(selector)
            .cloned()
            .ok_or_else(|| BrowserError::MissingElement(selector.to_string()))
    }

    async fn title(&mut self) -> Result<String, BrowserError> {
        let page = self.page_mut()?;
        if page.url.contains("example.com") {
            Ok("Example Domain".to_string())
        } else {
            Ok(page.url.clone())
        }
    }

    async fn text_of(&mut self, selector: &str) -> Result<String, BrowserError> {
        let page = self.page_mut()?;
        if page.url.contains("example.com") && selector == "h1" {
            Ok("Example Domain".to_string())
        } else {
            Err(BrowserError::MissingElement(selector.to_string()))
        }
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, BrowserError> {
        Ok(PLACEHOLDER_PNG.to_vec())
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        self.page = None;
        Ok(())
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

    use async_trait::async_trait;
    use testlab_core::ScenarioKind;

    use super::BrowserDriver;
    use super::BrowserError;
    use super::ScriptedBrowser;
    use super::StepStatus;
    use super::run_scenario;

    #[tokio::test]
    async fn login_demo_passes_every_step() {
        let mut driver = ScriptedBrowser::new();
        let outcome = run_scenario(&mut driver, ScenarioKind::LoginDemo).await;
        assert!(outcome.success);
        assert!(outcome.error.is_none());
        assert_eq!(outcome.steps.len(), 6);
        assert!(outcome.steps.iter().all(|step| step.status == StepStatus::Passed));
        let shot = outcome.screenshot.unwrap();
        assert!(shot.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn all_catalog_scenarios_pass_on_the_scripted_driver() {
        for kind in [
            ScenarioKind::LoginDemo,
            ScenarioKind::SearchDemo,
            ScenarioKind::FormDemo,
            ScenarioKind::PageDemo,
        ] {
            let mut driver = ScriptedBrowser::new();
            let outcome = run_scenario(&mut driver, kind).await;
            assert!(outcome.success, "{kind:?} should pass");
            assert!(!outcome.steps.is_empty());
        }
    }

    #[tokio::test]
    async fn step_ordinals_are_one_based_and_ordered() {
        let mut driver = ScriptedBrowser::new();
        let outcome = run_scenario(&mut driver, ScenarioKind::SearchDemo).await;
        for (index, step) in outcome.steps.iter().enumerate() {
            assert_eq!(step.step, u32::try_from(index).unwrap() + 1);
        }
    }

    /// Driver whose navigation always fails, for failure-path coverage.
    struct BrokenDriver {
        inner: ScriptedBrowser,
    }

    #[async_trait]
    impl BrowserDriver for BrokenDriver {
        async fn navigate(&mut self, _url: &str) -> Result<(), BrowserError> {
            Err(BrowserError::Driver("net::ERR_NAME_NOT_RESOLVED".to_string()))
        }

        async fn fill(&mut self, selector: &str, value: &str) -> Result<(), BrowserError> {
            self.inner.fill(selector, value).await
        }

        async fn select(&mut self, selector: &str, value: &str) -> Result<(), BrowserError> {
            self.inner.select(selector, value).await
        }

        async fn press(&mut self, key: &str) -> Result<(), BrowserError> {
            self.inner.press(key).await
        }

        async fn is_visible(&mut self, selector: &str) -> Result<bool, BrowserError> {
            self.inner.is_visible(selector).await
        }

        async fn value_of(&mut self, selector: &str) -> Result<String, BrowserError> {
            self.inner.value_of(selector).await
        }

        async fn title(&mut self) -> Result<String, BrowserError> {
            self.inner.title().await
        }

        async fn text_of(&mut self, selector: &str) -> Result<String, BrowserError> {
            self.inner.text_of(selector).await
        }

        async fn screenshot(&mut self) -> Result<Vec<u8>, BrowserError> {
            self.inner.screenshot().await
        }

        async fn close(&mut self) -> Result<(), BrowserError> {
            self.inner.close().await
        }
    }

    #[tokio::test]
    async fn failed_navigation_is_recorded_and_still_screenshots() {
        let mut driver = BrokenDriver {
            inner: ScriptedBrowser::new(),
        };
        let outcome = run_scenario(&mut driver, ScenarioKind::LoginDemo).await;
        assert!(!outcome.success);
        assert_eq!(outcome.steps.len(), 1);
        assert_eq!(outcome.steps[0].status, StepStatus::Failed);
        assert!(outcome.error.unwrap().contains("ERR_NAME_NOT_RESOLVED"));
        assert!(outcome.screenshot.is_some());
    }
}
