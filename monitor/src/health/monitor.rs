//! Connection health monitor
//!
//! Owns the state machine and the single-in-flight recovery guard. The
//! backend handle is injected at construction; the monitor never looks up a
//! global object and never constructs a second handle.

use anyhow::Result;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::classify::{FailureAction, FailureClassifier};
use super::probes::run_probe_sweep;
use super::recovery::{confirm_round_trip, run_recovery_sequence};
use super::types::{BackendStatus, ConnectionState, ProbeTarget, RecoveryAttempt};
use crate::backend::{BackendHandle, InitHook};
use crate::config::Config;
use crate::constants::{markers, recovery};

#[derive(Clone)]
pub struct ConnectionMonitor {
    config: Arc<Config>,
    backend: Arc<dyn BackendHandle>,
    init_hook: Option<Arc<dyn InitHook>>,
    classifier: Arc<FailureClassifier>,
    state: Arc<Mutex<ConnectionState>>,
    /// Last confirmed availability; derived only, never set by callers
    available: Arc<AtomicBool>,
    /// Single-in-flight recovery guard. A flag, not a lock: duplicate
    /// triggers coalesce into no-ops instead of queueing.
    recovery_in_flight: Arc<AtomicBool>,
}

impl ConnectionMonitor {
    pub fn new(
        config: Arc<Config>,
        backend: Arc<dyn BackendHandle>,
        init_hook: Option<Arc<dyn InitHook>>,
    ) -> Self {
        let benign = config
            .benign_error_markers
            .clone()
            .unwrap_or_else(|| markers::BENIGN.iter().map(|m| m.to_string()).collect());
        let recoverable = config
            .recovery_error_markers
            .clone()
            .unwrap_or_else(|| markers::RECOVERABLE.iter().map(|m| m.to_string()).collect());

        Self {
            config,
            backend,
            init_hook,
            classifier: Arc::new(FailureClassifier::new(benign, recoverable)),
            state: Arc::new(Mutex::new(ConnectionState::Uninitialized)),
            available: Arc::new(AtomicBool::new(false)),
            recovery_in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn current_state(&self) -> ConnectionState {
        *self.state.lock().await
    }

    /// Fresh snapshot, recomputed from the live handle on every call.
    pub async fn get_status(&self) -> BackendStatus {
        self.build_status().await
    }

    /// Determine whether the backend is reachable and usable, initializing
    /// the handle through the registered hook when it is absent.
    pub async fn check_health(&self) -> Result<BackendStatus> {
        if !self.backend.is_initialized() {
            self.set_state(ConnectionState::Initializing).await;

            match &self.init_hook {
                Some(hook) => {
                    info!("Backend handle not initialized, invoking init hook");
                    if let Err(e) = hook.initialize().await {
                        warn!("Backend initialization failed: {}", e);
                        self.set_state(ConnectionState::Uninitialized).await;
                        return Ok(self.build_status().await);
                    }
                }
                None => {
                    warn!("Backend handle not initialized and no init hook registered");
                    self.set_state(ConnectionState::Uninitialized).await;
                    return Ok(self.build_status().await);
                }
            }

            if !self.backend.is_initialized() {
                warn!("Init hook ran but the backend handle is still uninitialized");
                self.set_state(ConnectionState::Uninitialized).await;
                return Ok(self.build_status().await);
            }
        } else if self.current_state().await == ConnectionState::Unrecoverable {
            // A manual re-check is the only way out of the terminal state
            info!("Manual health check after unrecoverable failure, re-validating");
            self.set_state(ConnectionState::Initializing).await;
        }

        match self.backend.data_store() {
            Some(store) => match confirm_round_trip(store.as_ref()).await {
                Ok(()) => {
                    self.available.store(true, Ordering::SeqCst);
                    self.set_state(ConnectionState::Ready).await;
                    debug!("Confirmatory round-trip succeeded");
                }
                Err(e) => {
                    // Previous availability holds until recovery concludes
                    warn!("Confirmatory round-trip failed: {}", e);
                    self.set_state(ConnectionState::Degraded).await;
                    self.attempt_recovery().await;
                }
            },
            None => {
                warn!("Data store capability absent, skipping confirmatory round-trip");
            }
        }

        Ok(self.build_status().await)
    }

    /// Run the bounded recovery sequence, unless one is already in flight
    /// (in which case this trigger coalesces into a no-op report).
    pub async fn attempt_recovery(&self) -> RecoveryAttempt {
        let triggered_at = Utc::now();

        if self
            .recovery_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Recovery already in flight, coalescing duplicate trigger");
            return RecoveryAttempt::started(triggered_at);
        }

        self.set_state(ConnectionState::Recovering).await;
        info!("Starting connection recovery sequence");

        let attempt =
            run_recovery_sequence(self.backend.as_ref(), &self.config, triggered_at).await;

        if attempt.reestablished {
            self.available.store(true, Ordering::SeqCst);
            self.set_state(ConnectionState::Ready).await;
            info!("Connection recovery succeeded (cache cleared: {})", attempt.cleared);
        } else {
            self.available.store(false, Ordering::SeqCst);
            self.set_state(ConnectionState::Unrecoverable).await;
            error!(
                "Connection not reestablished after {} recovery steps; manual re-check required",
                recovery::STEP_COUNT
            );
        }

        self.recovery_in_flight.store(false, Ordering::SeqCst);
        attempt
    }

    /// One scheduled check: a diagnostic probe sweep over the configured
    /// targets, then the health check. Each invocation re-probes; probe
    /// outcomes feed logs only and never gate the check.
    pub async fn run_scheduled_check(
        &self,
        probe_client: &reqwest::Client,
        targets: &[ProbeTarget],
    ) -> Result<BackendStatus> {
        if !targets.is_empty() {
            run_probe_sweep(probe_client, targets).await;
        }
        self.check_health().await
    }

    /// Manual alias for [`attempt_recovery`](Self::attempt_recovery),
    /// invocable on demand from the diagnostics surface.
    pub async fn fix_connection(&self) -> RecoveryAttempt {
        info!("Manual connection fix requested");
        self.attempt_recovery().await
    }

    /// Last-resort failure interceptor. Returns true when the message was
    /// recognized and suppressed. Must never panic or block.
    pub fn handle_failure_signal(&self, message: &str) -> bool {
        match self.classifier.classify(message) {
            FailureAction::Suppress => {
                warn!("Suppressed benign backend error: {}", message);
                true
            }
            FailureAction::SuppressAndRecover => {
                warn!("Backend failure intercepted, scheduling recovery: {}", message);
                let monitor = self.clone();
                tokio::spawn(async move {
                    monitor.mark_degraded().await;
                    monitor.attempt_recovery().await;
                });
                true
            }
            FailureAction::Propagate => false,
        }
    }

    async fn mark_degraded(&self) {
        let mut state = self.state.lock().await;
        if *state == ConnectionState::Ready {
            *state = ConnectionState::Degraded;
        }
    }

    async fn set_state(&self, next: ConnectionState) {
        let mut state = self.state.lock().await;
        if *state != next {
            debug!("Connection state {:?} -> {:?}", *state, next);
            *state = next;
        }
    }

    async fn build_status(&self) -> BackendStatus {
        let initialized = self.backend.is_initialized();

        let mut service_flags = HashMap::new();
        service_flags.insert("data_store".to_string(), self.backend.data_store().is_some());
        service_flags.insert("auth".to_string(), self.backend.auth().is_some());
        service_flags.insert(
            "object_store".to_string(),
            self.backend.object_store().is_some(),
        );
        service_flags.insert("messaging".to_string(), self.backend.messaging().is_some());

        let current_session_id = match self.backend.auth() {
            Some(auth) => auth.current_session().await,
            None => None,
        };

        BackendStatus {
            available: self.available.load(Ordering::SeqCst),
            initialized,
            service_flags,
            current_session_id,
            state: self.current_state().await,
        }
    }
}
