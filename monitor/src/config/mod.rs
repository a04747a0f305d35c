pub mod manager;
use serde::{Deserialize, Serialize};
pub use manager::ConfigManager;

use crate::constants::{recovery, schedule, sentinel, web};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Delay before the first health check after startup
    #[serde(default = "default_initial_check_delay")]
    pub initial_check_delay_seconds: u64,
    /// Delay before the second startup health check (late initialization)
    #[serde(default = "default_second_check_delay")]
    pub second_check_delay_seconds: u64,
    /// Periodic check interval; 0 disables the periodic loop
    #[serde(default = "default_check_interval")]
    pub check_interval_seconds: u64,
    /// Per-step recovery timeout; a hung step counts as failed
    #[serde(default = "default_recovery_step_timeout")]
    pub recovery_step_timeout_seconds: u64,
    /// Failure-message substrings that are suppressed without recovery
    pub benign_error_markers: Option<Vec<String>>,
    /// Failure-message substrings that schedule a recovery attempt
    pub recovery_error_markers: Option<Vec<String>>,
    /// Reachability probe targets, fixed per deployment
    #[serde(default)]
    pub probes: Vec<ProbeTargetConfig>,
    pub backend: BackendConfig,
    pub bundle: Option<BundleConfig>,
}

/// One external endpoint probed for liveness
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeTargetConfig {
    pub url: String,
    pub label: String,
}

/// Opaque backend client configuration
///
/// Credentials and identifiers are passed through to the handle as-is,
/// never parsed or validated here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub api_key: String,
    pub project_id: String,
    #[serde(default = "default_sentinel_path")]
    pub sentinel_path: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Static verification token supplied by the host environment; when
    /// absent, writes carry no verification header
    pub verification_token: Option<String>,
}

/// Application bundle to inject once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    pub url: String,
}

fn default_host() -> String {
    web::DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    web::DEFAULT_PORT
}

fn default_initial_check_delay() -> u64 {
    schedule::INITIAL_CHECK_DELAY_SECONDS
}

fn default_second_check_delay() -> u64 {
    schedule::SECOND_CHECK_DELAY_SECONDS
}

fn default_check_interval() -> u64 {
    schedule::DEFAULT_CHECK_INTERVAL_SECONDS
}

fn default_recovery_step_timeout() -> u64 {
    recovery::DEFAULT_STEP_TIMEOUT_SECONDS
}

fn default_sentinel_path() -> String {
    sentinel::DEFAULT_PATH.to_string()
}

fn default_request_timeout() -> u64 {
    10
}
