//! Connection health monitoring module
//!
//! Probes, failure classification, the connection state machine, and the
//! bounded recovery sequence.

pub mod classify;
pub mod monitor;
pub mod probes;
mod recovery;
pub mod types;

pub use monitor::ConnectionMonitor;
pub use types::{BackendStatus, ConnectionState, ProbeOutcome, ProbeTarget, RecoveryAttempt};
