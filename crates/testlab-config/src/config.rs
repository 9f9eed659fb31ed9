// crates/testlab-config/src/config.rs
// ============================================================================
// Module: Configuration Model
// Description: TOML-backed configuration types and validation.
// Purpose: Keep every deployment limit explicit, bounded, and fail-closed.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! The configuration covers three concerns: the HTTP server (bind address and
//! body limits), the outbound probe (timeouts, user agent, response limits),
//! and lab limits (concurrency and duration ceilings, pacing delay cap).
//! Every numeric setting is validated against explicit bounds.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "testlab.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "TESTLAB_CONFIG";
/// Maximum configuration file size in bytes.
const MAX_CONFIG_FILE_SIZE: usize = 256 * 1024;
/// Minimum allowed request body limit in bytes.
const MIN_BODY_BYTES: usize = 1024;
/// Maximum allowed request body limit in bytes.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;
/// Minimum allowed outbound probe timeout in milliseconds.
const MIN_PROBE_TIMEOUT_MS: u64 = 100;
/// Maximum allowed outbound probe timeout in milliseconds.
const MAX_PROBE_TIMEOUT_MS: u64 = 60_000;
/// Maximum allowed outbound response size in bytes.
const MAX_PROBE_RESPONSE_BYTES: usize = 16 * 1024 * 1024;
/// Maximum allowed user agent length.
const MAX_USER_AGENT_LENGTH: usize = 256;
/// Maximum allowed virtual user ceiling.
const MAX_VIRTUAL_USER_CEILING: u32 = 100_000;
/// Maximum allowed duration ceiling in seconds.
const MAX_DURATION_CEILING_SECS: u32 = 86_400;
/// Maximum allowed pacing delay cap in milliseconds.
const MAX_PACING_CAP_MS: u64 = 30_000;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Top-level testlab configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestLabConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Outbound probe configuration.
    #[serde(default)]
    pub probe: ProbeConfig,
    /// Lab input ceilings and pacing.
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Outbound probe settings shared by the scan and API labs.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    /// Ceiling for the outbound request timeout in milliseconds.
    #[serde(default = "default_probe_timeout_ms")]
    pub timeout_ms: u64,
    /// User agent sent on outbound requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Maximum outbound response size read into memory, in bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_probe_timeout_ms(),
            user_agent: default_user_agent(),
            max_response_bytes: default_max_response_bytes(),
        }
    }
}

/// Ceilings applied to lab inputs before plan construction.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum accepted virtual user count; larger requests are clamped.
    #[serde(default = "default_max_virtual_users")]
    pub max_virtual_users: u32,
    /// Maximum accepted test duration in seconds; larger requests are clamped.
    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: u32,
    /// Cap on the artificial pacing delay in milliseconds; zero disables it.
    #[serde(default = "default_pacing_cap_ms")]
    pub pacing_cap_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_virtual_users: default_max_virtual_users(),
            max_duration_secs: default_max_duration_secs(),
            pacing_cap_ms: default_pacing_cap_ms(),
        }
    }
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default bind address.
fn default_bind() -> String {
    "127.0.0.1:8787".to_string()
}

/// Default request body limit.
const fn default_max_body_bytes() -> usize {
    64 * 1024
}

/// Default outbound timeout ceiling.
const fn default_probe_timeout_ms() -> u64 {
    10_000
}

/// Default outbound user agent.
fn default_user_agent() -> String {
    "testlab-probe/0.1".to_string()
}

/// Default outbound response size limit.
const fn default_max_response_bytes() -> usize {
    1024 * 1024
}

/// Default virtual user ceiling.
const fn default_max_virtual_users() -> u32 {
    1_000
}

/// Default duration ceiling.
const fn default_max_duration_secs() -> u32 {
    600
}

/// Default pacing delay cap.
const fn default_pacing_cap_ms() -> u64 {
    5_000
}

// ============================================================================
// SECTION: Loading and Validation
// ============================================================================

impl TestLabConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: explicit path, then [`CONFIG_ENV_VAR`], then
    /// `testlab.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path);
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Parse("config file is not valid utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every setting against its bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for the first out-of-range setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.bind.parse::<SocketAddr>().map_err(|_| {
            ConfigError::Invalid(format!("server.bind is not a socket address: {}", self.server.bind))
        })?;
        if !(MIN_BODY_BYTES..=MAX_BODY_BYTES).contains(&self.server.max_body_bytes) {
            return Err(ConfigError::Invalid("server.max_body_bytes out of range".to_string()));
        }
        if !(MIN_PROBE_TIMEOUT_MS..=MAX_PROBE_TIMEOUT_MS).contains(&self.probe.timeout_ms) {
            return Err(ConfigError::Invalid("probe.timeout_ms out of range".to_string()));
        }
        if self.probe.max_response_bytes == 0
            || self.probe.max_response_bytes > MAX_PROBE_RESPONSE_BYTES
        {
            return Err(ConfigError::Invalid("probe.max_response_bytes out of range".to_string()));
        }
        if self.probe.user_agent.is_empty() || self.probe.user_agent.len() > MAX_USER_AGENT_LENGTH {
            return Err(ConfigError::Invalid("probe.user_agent out of range".to_string()));
        }
        if self.limits.max_virtual_users == 0
            || self.limits.max_virtual_users > MAX_VIRTUAL_USER_CEILING
        {
            return Err(ConfigError::Invalid("limits.max_virtual_users out of range".to_string()));
        }
        if self.limits.max_duration_secs == 0
            || self.limits.max_duration_secs > MAX_DURATION_CEILING_SECS
        {
            return Err(ConfigError::Invalid("limits.max_duration_secs out of range".to_string()));
        }
        if self.limits.pacing_cap_ms > MAX_PACING_CAP_MS {
            return Err(ConfigError::Invalid("limits.pacing_cap_ms out of range".to_string()));
        }
        Ok(())
    }
}

/// Resolves the configuration path from argument, environment, or default.
fn resolve_path(path: Option<&Path>) -> PathBuf {
    path.map_or_else(
        || {
            env::var_os(CONFIG_ENV_VAR)
                .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_NAME), PathBuf::from)
        },
        Path::to_path_buf,
    )
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("config io error: {0}")]
    Io(String),
    /// The config file could not be parsed.
    #[error("config parse error: {0}")]
    Parse(String),
    /// A setting failed bounds validation.
    #[error("invalid config: {0}")]
    Invalid(String),
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

    use super::LimitsConfig;
    use super::ProbeConfig;
    use super::ServerConfig;
    use super::TestLabConfig;

    #[test]
    fn default_config_validates() {
        assert!(TestLabConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config: TestLabConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8787");
        assert_eq!(config.limits.pacing_cap_ms, 5_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_overrides_one_section() {
        let config: TestLabConfig = toml::from_str(
            "[limits]\nmax_virtual_users = 50\nmax_duration_secs = 120\npacing_cap_ms = 0\n",
        )
        .unwrap();
        assert_eq!(config.limits.max_virtual_users, 50);
        assert_eq!(config.limits.pacing_cap_ms, 0);
        assert_eq!(config.server.max_body_bytes, 64 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_reads_and_validates_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("testlab.toml");
        std::fs::write(&path, "[server]\nbind = \"127.0.0.1:9191\"\n").unwrap();
        let config = TestLabConfig::load(Some(&path)).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:9191");
    }

    #[test]
    fn load_rejects_an_out_of_range_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("testlab.toml");
        std::fs::write(&path, "[probe]\ntimeout_ms = 1\n").unwrap();
        assert!(TestLabConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn invalid_bind_fails_validation() {
        let config = TestLabConfig {
            server: ServerConfig {
                bind: "not-an-address".to_string(),
                ..ServerConfig::default()
            },
            ..TestLabConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_ceilings_fail_validation() {
        let config = TestLabConfig {
            limits: LimitsConfig {
                max_virtual_users: 0,
                ..LimitsConfig::default()
            },
            ..TestLabConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_timeout_fails_validation() {
        let config = TestLabConfig {
            probe: ProbeConfig {
                timeout_ms: 120_000,
                ..ProbeConfig::default()
            },
            ..TestLabConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
