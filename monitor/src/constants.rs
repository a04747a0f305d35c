//! Application-wide constants for timeouts, delays, and default values
//!
//! Organized by category to provide a single source of truth for the
//! intervals and markers the monitor relies on.

#![allow(dead_code)] // Some constants are defined for configuration defaults only

use std::time::Duration;

/// HTTP client timeout constants
pub mod http {
    use super::Duration;

    /// Timeout for a single probe HEAD request
    pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

    /// Default timeout for backend requests (sentinel reads/writes)
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    /// Timeout for fetching an application bundle
    pub const BUNDLE_TIMEOUT: Duration = Duration::from_secs(60);
}

/// Health check scheduling constants
pub mod schedule {
    /// Delay before the first health check after startup, giving the
    /// backend handle time to initialize
    pub const INITIAL_CHECK_DELAY_SECONDS: u64 = 5;

    /// Delay before the second startup health check, covering backends
    /// that initialize late
    pub const SECOND_CHECK_DELAY_SECONDS: u64 = 15;

    /// Default periodic check interval; 0 disables the periodic loop
    pub const DEFAULT_CHECK_INTERVAL_SECONDS: u64 = 90;
}

/// Recovery sequence constants
pub mod recovery {
    /// Number of bounded steps in one recovery attempt
    pub const STEP_COUNT: u8 = 4;

    /// Default per-step timeout; a hung transport counts as a step failure
    pub const DEFAULT_STEP_TIMEOUT_SECONDS: u64 = 30;
}

/// Failure-message marker defaults
///
/// Substrings matched against uncaught failure messages. Benign markers are
/// evaluated first and must never trigger recovery; recoverable markers
/// schedule a single recovery attempt.
pub mod markers {
    /// Errors from re-applying settings to an already running store.
    /// Suppressed without recovery to avoid a reconfiguration loop.
    pub const BENIGN: &[&str] = &["already been started"];

    /// Backend-originated errors that warrant a recovery attempt
    pub const RECOVERABLE: &[&str] = &[
        "network error",
        "transport channel",
        "sentinel",
        "backend",
    ];
}

/// Sentinel record constants
pub mod sentinel {
    /// Default path of the well-known record used for confirmatory round-trips
    pub const DEFAULT_PATH: &str = "system/connection_test";

    /// Client tag written into the sentinel when the monitor recreates it
    pub const CLIENT_TAG: &str = "monitor-recovery";
}

/// Web server defaults
pub mod web {
    /// Default bind host for the diagnostics API
    pub const DEFAULT_HOST: &str = "0.0.0.0";

    /// Default bind port for the diagnostics API
    pub const DEFAULT_PORT: u16 = 8095;
}
