// crates/testlab-core/src/scenario.rs
// ============================================================================
// Module: Browser Scenario Catalog
// Description: Declarative action scripts for the browser automation lab.
// Purpose: Describe each demo walk as data interpreted by one generic runner.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Each browser scenario is a fixed, ordered list of steps; each step groups a
//! narrative label with the declarative driver actions it performs. A single
//! generic runner interprets these scripts, so resource acquisition and
//! cleanup live in one place instead of one bespoke function per scenario.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

// ============================================================================
// SECTION: Scenario Kinds
// ============================================================================

/// Named browser scenario selectable by the client.
///
/// # Invariants
/// - Wire names are stable kebab-case labels.
/// - Unknown wire names resolve to [`Self::PageDemo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioKind {
    /// Login form fill-and-verify walk.
    LoginDemo,
    /// Search engine query walk.
    SearchDemo,
    /// Order form fill-and-verify walk.
    FormDemo,
    /// Plain page load and content read.
    PageDemo,
}

impl ScenarioKind {
    /// Returns the stable wire name for the scenario.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LoginDemo => "login-demo",
            Self::SearchDemo => "search-demo",
            Self::FormDemo => "form-demo",
            Self::PageDemo => "page-demo",
        }
    }

    /// Resolves a wire name, falling back to the plain page walk.
    #[must_use]
    pub fn from_wire(name: &str) -> Self {
        match name {
            "login-demo" => Self::LoginDemo,
            "search-demo" => Self::SearchDemo,
            "form-demo" => Self::FormDemo,
            _ => Self::PageDemo,
        }
    }
}

// ============================================================================
// SECTION: Actions
// ============================================================================

/// One declarative browser driver action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserAction {
    /// Load a page.
    Navigate {
        /// Absolute URL to open.
        url: &'static str,
    },
    /// Type a value into a form field.
    Fill {
        /// CSS selector of the field.
        selector: &'static str,
        /// Value to type.
        value: &'static str,
    },
    /// Choose an option in a select element.
    Select {
        /// CSS selector of the select element.
        selector: &'static str,
        /// Option value to choose.
        value: &'static str,
    },
    /// Press a keyboard key on the focused element.
    Press {
        /// Key name, e.g. `Enter`.
        key: &'static str,
    },
    /// Assert an element is present and visible.
    AssertVisible {
        /// CSS selector of the element.
        selector: &'static str,
    },
    /// Read a field value and compare it to an expected string.
    ReadValue {
        /// CSS selector of the field.
        selector: &'static str,
        /// Value the field must contain.
        expected: &'static str,
    },
    /// Read the page title.
    ReadTitle,
    /// Read the text content of an element.
    ReadText {
        /// CSS selector of the element.
        selector: &'static str,
    },
}

/// One narrative step of a scenario: a label plus the actions it performs.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioStep {
    /// Short action label shown in the step log.
    pub label: &'static str,
    /// Longer description shown in the step log.
    pub description: &'static str,
    /// Driver actions executed for this step, in order.
    pub actions: &'static [BrowserAction],
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Login demo: fill a hosted login form and verify field state.
const LOGIN_DEMO: &[ScenarioStep] = &[
    ScenarioStep {
        label: "Navigate to demo site",
        description: "Opening the hosted login page for demonstration",
        actions: &[BrowserAction::Navigate {
            url: "https://github.com/login",
        }],
    },
    ScenarioStep {
        label: "Locate form elements",
        description: "Finding username and password fields",
        actions: &[],
    },
    ScenarioStep {
        label: "Validate elements",
        description: "Confirming all form elements are present and visible",
        actions: &[
            BrowserAction::AssertVisible {
                selector: "#login_field",
            },
            BrowserAction::AssertVisible {
                selector: "#password",
            },
            BrowserAction::AssertVisible {
                selector: "input[type=\"submit\"]",
            },
        ],
    },
    ScenarioStep {
        label: "Test form interaction",
        description: "Testing form field interactions (demo purposes only)",
        actions: &[
            BrowserAction::Fill {
                selector: "#login_field",
                value: "demo-test-user",
            },
            BrowserAction::Fill {
                selector: "#password",
                value: "demo-password",
            },
        ],
    },
    ScenarioStep {
        label: "Validate form state",
        description: "Confirming form fields contain expected values",
        actions: &[
            BrowserAction::ReadValue {
                selector: "#login_field",
                expected: "demo-test-user",
            },
            BrowserAction::ReadValue {
                selector: "#password",
                expected: "demo-password",
            },
        ],
    },
    ScenarioStep {
        label: "Test completed successfully",
        description: "Login form validation test passed - all elements functional",
        actions: &[],
    },
];

/// Search demo: run a query on a public search engine.
const SEARCH_DEMO: &[ScenarioStep] = &[
    ScenarioStep {
        label: "Navigate to search page",
        description: "Opening the search engine landing page",
        actions: &[BrowserAction::Navigate {
            url: "https://duckduckgo.com",
        }],
    },
    ScenarioStep {
        label: "Locate search elements",
        description: "Finding search input field and search button",
        actions: &[BrowserAction::AssertVisible {
            selector: "input[name=\"q\"]",
        }],
    },
    ScenarioStep {
        label: "Perform search",
        description: "Searching for \"Playwright testing automation\"",
        actions: &[
            BrowserAction::Fill {
                selector: "input[name=\"q\"]",
                value: "Playwright testing automation",
            },
            BrowserAction::Press {
                key: "Enter",
            },
        ],
    },
    ScenarioStep {
        label: "Validate search results",
        description: "Confirming search results are displayed",
        actions: &[BrowserAction::AssertVisible {
            selector: "[data-testid=\"result\"]",
        }],
    },
    ScenarioStep {
        label: "Test completed",
        description: "Search functionality validated successfully",
        actions: &[],
    },
];

/// Form demo: fill a public HTML form and verify field state.
const FORM_DEMO: &[ScenarioStep] = &[
    ScenarioStep {
        label: "Navigate to form demo",
        description: "Opening the HTML form testing page",
        actions: &[BrowserAction::Navigate {
            url: "https://httpbin.org/forms/post",
        }],
    },
    ScenarioStep {
        label: "Fill form fields",
        description: "Testing various form input types",
        actions: &[
            BrowserAction::Fill {
                selector: "input[name=\"custname\"]",
                value: "Test User",
            },
            BrowserAction::Fill {
                selector: "input[name=\"custtel\"]",
                value: "555-1234",
            },
            BrowserAction::Fill {
                selector: "input[name=\"custemail\"]",
                value: "test@example.com",
            },
            BrowserAction::Select {
                selector: "select[name=\"size\"]",
                value: "large",
            },
        ],
    },
    ScenarioStep {
        label: "Validate form state",
        description: "Confirming all form fields contain expected values",
        actions: &[
            BrowserAction::ReadValue {
                selector: "input[name=\"custname\"]",
                expected: "Test User",
            },
            BrowserAction::ReadValue {
                selector: "input[name=\"custemail\"]",
                expected: "test@example.com",
            },
        ],
    },
    ScenarioStep {
        label: "Form validation passed",
        description: "All form fields validated successfully",
        actions: &[],
    },
];

/// Page demo: load a static page and read its content.
const PAGE_DEMO: &[ScenarioStep] = &[
    ScenarioStep {
        label: "Navigate to test page",
        description: "Opening example.com for basic functionality test",
        actions: &[BrowserAction::Navigate {
            url: "https://example.com",
        }],
    },
    ScenarioStep {
        label: "Validate page load",
        description: "Confirming page loaded successfully",
        actions: &[BrowserAction::ReadTitle],
    },
    ScenarioStep {
        label: "Validate page content",
        description: "Reading the main page heading",
        actions: &[BrowserAction::ReadText {
            selector: "h1",
        }],
    },
];

/// Returns the step script for a scenario.
#[must_use]
pub const fn script_for(kind: ScenarioKind) -> &'static [ScenarioStep] {
    match kind {
        ScenarioKind::LoginDemo => LOGIN_DEMO,
        ScenarioKind::SearchDemo => SEARCH_DEMO,
        ScenarioKind::FormDemo => FORM_DEMO,
        ScenarioKind::PageDemo => PAGE_DEMO,
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

    use super::BrowserAction;
    use super::ScenarioKind;
    use super::script_for;

    #[test]
    fn unknown_wire_names_fall_back_to_page_demo() {
        assert_eq!(ScenarioKind::from_wire("login-demo"), ScenarioKind::LoginDemo);
        assert_eq!(ScenarioKind::from_wire("banana"), ScenarioKind::PageDemo);
    }

    #[test]
    fn every_scenario_starts_with_a_navigation() {
        for kind in [
            ScenarioKind::LoginDemo,
            ScenarioKind::SearchDemo,
            ScenarioKind::FormDemo,
            ScenarioKind::PageDemo,
        ] {
            let script = script_for(kind);
            assert!(!script.is_empty());
            assert!(matches!(
                script[0].actions[0],
                BrowserAction::Navigate {
                    ..
                }
            ));
        }
    }

    #[test]
    fn login_demo_verifies_what_it_fills() {
        let script = script_for(ScenarioKind::LoginDemo);
        let fills = script
            .iter()
            .flat_map(|step| step.actions)
            .filter(|action| {
                matches!(
                    action,
                    BrowserAction::Fill {
                        ..
                    }
                )
            })
            .count();
        let reads = script
            .iter()
            .flat_map(|step| step.actions)
            .filter(|action| {
                matches!(
                    action,
                    BrowserAction::ReadValue {
                        ..
                    }
                )
            })
            .count();
        assert_eq!(fills, reads);
    }
}
