//! Scriptable backend fake
//!
//! Records the order of every capability call and replays programmed
//! sentinel-read outcomes, so tests can verify recovery-step ordering and
//! single-flight behavior without a network.

use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use monitor::backend::{Auth, BackendHandle, DataStore, InitHook, Messaging, ObjectStore, TransportOptions};
use monitor::config::BackendConfig;
use monitor::errors::BackendError;

struct ScriptState {
    initialized: AtomicBool,
    has_data_store: AtomicBool,
    calls: Mutex<Vec<String>>,
    /// Programmed read outcomes consumed front-to-back; the default applies
    /// once the queue is empty
    read_queue: Mutex<VecDeque<Result<serde_json::Value, BackendError>>>,
    read_default_ok: AtomicBool,
    fail_configure: AtomicBool,
    fail_disable: AtomicBool,
    fail_enable: AtomicBool,
    fail_clear: AtomicBool,
    /// Artificial latency inside disable_network, used to hold a recovery
    /// attempt in flight while concurrent triggers arrive
    disable_delay_ms: AtomicUsize,
    clear_count: AtomicUsize,
    session: Mutex<Option<String>>,
}

#[derive(Clone)]
pub struct ScriptedBackend {
    state: Arc<ScriptState>,
}

impl ScriptedBackend {
    /// Initialized backend where every operation succeeds.
    pub fn new() -> Self {
        Self::with_initialized(true)
    }

    /// Backend whose handle does not exist yet; `initialize` brings it up.
    pub fn uninitialized() -> Self {
        Self::with_initialized(false)
    }

    fn with_initialized(initialized: bool) -> Self {
        Self {
            state: Arc::new(ScriptState {
                initialized: AtomicBool::new(initialized),
                has_data_store: AtomicBool::new(true),
                calls: Mutex::new(Vec::new()),
                read_queue: Mutex::new(VecDeque::new()),
                read_default_ok: AtomicBool::new(true),
                fail_configure: AtomicBool::new(false),
                fail_disable: AtomicBool::new(false),
                fail_enable: AtomicBool::new(false),
                fail_clear: AtomicBool::new(false),
                disable_delay_ms: AtomicUsize::new(0),
                clear_count: AtomicUsize::new(0),
                session: Mutex::new(Some("session-1".to_string())),
            }),
        }
    }

    pub fn without_data_store(self) -> Self {
        self.state.has_data_store.store(false, Ordering::SeqCst);
        self
    }

    /// Queue the outcome of the next sentinel read.
    pub fn push_read(&self, outcome: Result<serde_json::Value, BackendError>) {
        self.state
            .read_queue
            .lock()
            .unwrap()
            .push_back(outcome);
    }

    /// Set whether reads succeed once the queue is drained.
    pub fn set_read_default_ok(&self, ok: bool) {
        self.state.read_default_ok.store(ok, Ordering::SeqCst);
    }

    pub fn set_fail_configure(&self, fail: bool) {
        self.state.fail_configure.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_disable(&self, fail: bool) {
        self.state.fail_disable.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_enable(&self, fail: bool) {
        self.state.fail_enable.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_clear(&self, fail: bool) {
        self.state.fail_clear.store(fail, Ordering::SeqCst);
    }

    pub fn set_disable_delay(&self, delay: Duration) {
        self.state
            .disable_delay_ms
            .store(delay.as_millis() as usize, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == name).count()
    }

    pub fn clear_count(&self) -> usize {
        self.state.clear_count.load(Ordering::SeqCst)
    }

    fn record(&self, name: &str) {
        self.state.calls.lock().unwrap().push(name.to_string());
    }
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackendHandle for ScriptedBackend {
    fn is_initialized(&self) -> bool {
        self.state.initialized.load(Ordering::SeqCst)
    }

    async fn initialize(&self, _config: &BackendConfig) -> Result<(), BackendError> {
        self.record("initialize");
        self.state.initialized.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn data_store(&self) -> Option<Arc<dyn DataStore>> {
        if !self.state.has_data_store.load(Ordering::SeqCst) {
            return None;
        }
        Some(Arc::new(ScriptedStore {
            backend: self.clone(),
        }))
    }

    fn auth(&self) -> Option<Arc<dyn Auth>> {
        Some(Arc::new(ScriptedAuth {
            backend: self.clone(),
        }))
    }

    fn object_store(&self) -> Option<Arc<dyn ObjectStore>> {
        Some(Arc::new(ScriptedObjectStore))
    }

    fn messaging(&self) -> Option<Arc<dyn Messaging>> {
        None
    }
}

struct ScriptedStore {
    backend: ScriptedBackend,
}

#[async_trait]
impl DataStore for ScriptedStore {
    async fn configure_transport(&self, _options: TransportOptions) -> Result<(), BackendError> {
        self.backend.record("configure_transport");
        if self.backend.state.fail_configure.load(Ordering::SeqCst) {
            return Err(BackendError::Settings {
                reason: "data store has already been started and its settings can no longer be changed"
                    .to_string(),
            });
        }
        Ok(())
    }

    async fn read_sentinel(&self) -> Result<serde_json::Value, BackendError> {
        self.backend.record("read_sentinel");
        if let Some(outcome) = self.backend.state.read_queue.lock().unwrap().pop_front() {
            return outcome;
        }
        if self.backend.state.read_default_ok.load(Ordering::SeqCst) {
            Ok(json!({"client": "test"}))
        } else {
            Err(BackendError::Network {
                reason: "scripted sentinel failure".to_string(),
            })
        }
    }

    async fn write_sentinel(&self, _value: serde_json::Value) -> Result<(), BackendError> {
        self.backend.record("write_sentinel");
        Ok(())
    }

    async fn disable_network(&self) -> Result<(), BackendError> {
        self.backend.record("disable_network");
        let delay = self.backend.state.disable_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay as u64)).await;
        }
        if self.backend.state.fail_disable.load(Ordering::SeqCst) {
            return Err(BackendError::Network {
                reason: "scripted disable failure".to_string(),
            });
        }
        Ok(())
    }

    async fn enable_network(&self) -> Result<(), BackendError> {
        self.backend.record("enable_network");
        if self.backend.state.fail_enable.load(Ordering::SeqCst) {
            return Err(BackendError::Network {
                reason: "scripted enable failure".to_string(),
            });
        }
        Ok(())
    }

    async fn clear_local_cache(&self) -> Result<(), BackendError> {
        self.backend.record("clear_local_cache");
        if self.backend.state.fail_clear.load(Ordering::SeqCst) {
            return Err(BackendError::Settings {
                reason: "cannot clear local cache while the data store is active".to_string(),
            });
        }
        self.backend.state.clear_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct ScriptedAuth {
    backend: ScriptedBackend,
}

#[async_trait]
impl Auth for ScriptedAuth {
    async fn current_session(&self) -> Option<String> {
        self.backend.state.session.lock().unwrap().clone()
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.backend.record("sign_out");
        self.backend.state.session.lock().unwrap().take();
        Ok(())
    }
}

struct ScriptedObjectStore;

impl ObjectStore for ScriptedObjectStore {}

/// Init hook that counts invocations and optionally brings the scripted
/// backend up.
pub struct CountingInitHook {
    backend: ScriptedBackend,
    brings_backend_up: bool,
    invocations: AtomicUsize,
}

impl CountingInitHook {
    pub fn new(backend: ScriptedBackend, brings_backend_up: bool) -> Arc<Self> {
        Arc::new(Self {
            backend,
            brings_backend_up,
            invocations: AtomicUsize::new(0),
        })
    }

    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InitHook for CountingInitHook {
    async fn initialize(&self) -> Result<(), BackendError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        if self.brings_backend_up {
            self.backend
                .state
                .initialized
                .store(true, Ordering::SeqCst);
        }
        Ok(())
    }
}
