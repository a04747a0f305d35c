//! Connection monitoring types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One external endpoint probed for reachability. Immutable after startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeTarget {
    pub url: String,
    pub label: String,
}

/// Outcome of a single reachability probe. Network errors are classified,
/// never propagated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeOutcome {
    Reachable,
    Unreachable,
}

/// Snapshot of the backend connection, rebuilt fresh on every query from the
/// live handle. Never partially updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendStatus {
    /// Derived only: true after a successful confirmatory round-trip, false
    /// once a failure signal is confirmed
    pub available: bool,
    pub initialized: bool,
    /// Capability presence per service, not operation results
    pub service_flags: HashMap<String, bool>,
    pub current_session_id: Option<String>,
    pub state: ConnectionState,
}

/// Connection state machine.
///
/// `Unrecoverable` is terminal for the session; a manual `check_health`
/// loops back to `Initializing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Uninitialized,
    Initializing,
    Ready,
    Degraded,
    Recovering,
    Unrecoverable,
}

/// Record of one recovery run. Short-lived, never persisted; its only
/// structural role is reporting and overlap prevention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryAttempt {
    pub triggered_at: DateTime<Utc>,
    /// Local cache was cleared during step 3
    pub cleared: bool,
    /// The confirmatory round-trip succeeded before the steps ran out
    pub reestablished: bool,
}

impl RecoveryAttempt {
    pub fn started(triggered_at: DateTime<Utc>) -> Self {
        Self {
            triggered_at,
            cleared: false,
            reestablished: false,
        }
    }
}
