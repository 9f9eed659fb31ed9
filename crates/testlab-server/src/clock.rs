// crates/testlab-server/src/clock.rs
// ============================================================================
// Module: Clock Helpers
// Description: Wall-clock reads and RFC 3339 formatting for responses.
// Purpose: Keep all time access at the server edge; core code stays pure.
// Dependencies: time
// ============================================================================

//! ## Overview
//! The core crates never read the clock; handlers read it here once per
//! request and pass explicit values down. Formatting failures degrade to an
//! empty string rather than an error, since timestamps are response metadata.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Milliseconds in one day.
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Returns the current unix time in milliseconds.
#[must_use]
pub fn now_unix_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|elapsed| i64::try_from(elapsed.as_millis()).ok())
        .unwrap_or(0)
}

/// Formats a unix-millisecond timestamp as RFC 3339.
#[must_use]
pub fn rfc3339_from_unix_ms(unix_ms: i64) -> String {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(unix_ms) * 1_000_000)
        .ok()
        .and_then(|moment| moment.format(&Rfc3339).ok())
        .unwrap_or_default()
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

    use super::rfc3339_from_unix_ms;

    #[test]
    fn epoch_formats_to_rfc3339() {
        assert_eq!(rfc3339_from_unix_ms(0), "1970-01-01T00:00:00Z");
    }

    #[test]
    fn subsecond_timestamps_stay_within_the_same_second() {
        let formatted = rfc3339_from_unix_ms(1_500);
        assert!(formatted.starts_with("1970-01-01T00:00:01"));
        assert!(formatted.ends_with('Z'));
    }
}
