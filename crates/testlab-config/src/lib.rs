// crates/testlab-config/src/lib.rs
// ============================================================================
// Module: testlab Configuration
// Description: Configuration loading and validation for the labs service.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size limits and
//! validated before use. Invalid configuration fails closed: the service
//! refuses to start rather than running with out-of-range limits.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::CONFIG_ENV_VAR;
pub use config::ConfigError;
pub use config::LimitsConfig;
pub use config::ProbeConfig;
pub use config::ServerConfig;
pub use config::TestLabConfig;
