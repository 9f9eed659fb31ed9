// crates/testlab-probe/src/headers.rs
// ============================================================================
// Module: Security Header Probe
// Description: Single HEAD fetch capturing response headers for the scan lab.
// Purpose: Provide the one real artifact behind the simulated security scan.
// Dependencies: reqwest, testlab-config
// ============================================================================

//! ## Overview
//! The header probe issues one bounded HEAD request with a fixed timeout and
//! redirects disabled, and returns the response headers as a lowercase map.
//! Failures are reported to the caller, which degrades the scan's header
//! section instead of failing the whole scan.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::HeaderMap;
use reqwest::redirect::Policy;
use testlab_config::ProbeConfig;
use url::Url;

use crate::target::ProbeError;

// ============================================================================
// SECTION: Probe
// ============================================================================

/// Outbound HEAD probe for response header capture.
///
/// # Invariants
/// - Redirects are not followed.
/// - The configured timeout applies to the full request lifecycle.
pub struct HeaderProbe {
    /// HTTP client used for outbound requests.
    client: Client,
}

impl HeaderProbe {
    /// Creates a header probe from probe configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Build`] when the HTTP client cannot be created.
    pub fn new(config: &ProbeConfig) -> Result<Self, ProbeError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|err| ProbeError::Build(err.to_string()))?;
        Ok(Self {
            client,
        })
    }

    /// Fetches the target's response headers with one HEAD request.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Timeout`] or [`ProbeError::Network`] when the
    /// request does not complete.
    pub async fn fetch_headers(&self, url: &Url) -> Result<BTreeMap<String, String>, ProbeError> {
        let response =
            self.client.head(url.clone()).send().await.map_err(classify_transport_error)?;
        Ok(lowercase_header_map(response.headers()))
    }
}

/// Maps transport failures onto the probe error taxonomy.
pub(crate) fn classify_transport_error(err: reqwest::Error) -> ProbeError {
    if err.is_timeout() {
        ProbeError::Timeout
    } else {
        ProbeError::Network(err.to_string())
    }
}

/// Converts response headers to a lowercase name/value map.
pub(crate) fn lowercase_header_map(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value.to_str().ok().map(|text| (name.as_str().to_ascii_lowercase(), text.to_string()))
        })
        .collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
