//! Plain-HTTP reference implementation of the backend capabilities
//!
//! Speaks to a generic REST backend: the sentinel record is one document
//! path, network enable/disable gates requests client-side, and the local
//! cache is an in-memory map. Settings are frozen once the store has served
//! its first operation, which is where the benign "already been started"
//! error class originates.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{
    Auth, BackendHandle, DataStore, Messaging, ObjectStore, TransportOptions, VerificationStrategy,
};
use crate::config::BackendConfig;
use crate::errors::BackendError;

struct Inner {
    initialized: AtomicBool,
    /// Set on the first sentinel operation; settings are immutable after this
    started: AtomicBool,
    network_enabled: AtomicBool,
    client: Mutex<Option<HttpClient>>,
    config: Mutex<Option<BackendConfig>>,
    transport: Mutex<TransportOptions>,
    cache: Mutex<HashMap<String, serde_json::Value>>,
    session: Mutex<Option<String>>,
    verification: Arc<dyn VerificationStrategy>,
}

pub struct RestBackend {
    inner: Arc<Inner>,
}

impl RestBackend {
    pub fn new(verification: Arc<dyn VerificationStrategy>) -> Self {
        Self {
            inner: Arc::new(Inner {
                initialized: AtomicBool::new(false),
                started: AtomicBool::new(false),
                network_enabled: AtomicBool::new(true),
                client: Mutex::new(None),
                config: Mutex::new(None),
                transport: Mutex::new(TransportOptions::default()),
                cache: Mutex::new(HashMap::new()),
                session: Mutex::new(None),
                verification,
            }),
        }
    }
}

impl Inner {
    fn request_context(&self) -> Result<(HttpClient, BackendConfig), BackendError> {
        if !self.initialized.load(Ordering::SeqCst) {
            return Err(BackendError::NotInitialized);
        }
        let client = self
            .client
            .lock()
            .ok()
            .and_then(|c| c.clone())
            .ok_or(BackendError::NotInitialized)?;
        let config = self
            .config
            .lock()
            .ok()
            .and_then(|c| c.clone())
            .ok_or(BackendError::NotInitialized)?;
        Ok((client, config))
    }

    fn sentinel_url(config: &BackendConfig) -> String {
        format!(
            "{}/v1/projects/{}/{}",
            config.base_url.trim_end_matches('/'),
            config.project_id,
            config.sentinel_path
        )
    }

    fn ensure_network(&self) -> Result<(), BackendError> {
        if !self.network_enabled.load(Ordering::SeqCst) {
            return Err(BackendError::Network {
                reason: "transport channel is disabled".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl BackendHandle for RestBackend {
    fn is_initialized(&self) -> bool {
        self.inner.initialized.load(Ordering::SeqCst)
    }

    async fn initialize(&self, config: &BackendConfig) -> Result<(), BackendError> {
        let client = HttpClient::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| BackendError::Settings {
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        if let Ok(mut slot) = self.inner.client.lock() {
            *slot = Some(client);
        }
        if let Ok(mut slot) = self.inner.config.lock() {
            *slot = Some(config.clone());
        }
        if let Ok(mut session) = self.inner.session.lock() {
            if session.is_none() {
                *session = Some(Uuid::new_v4().to_string());
            }
        }

        self.inner.initialized.store(true, Ordering::SeqCst);
        debug!("Backend handle initialized for project {}", config.project_id);
        Ok(())
    }

    fn data_store(&self) -> Option<Arc<dyn DataStore>> {
        Some(Arc::new(RestDataStore {
            inner: self.inner.clone(),
        }))
    }

    fn auth(&self) -> Option<Arc<dyn Auth>> {
        Some(Arc::new(RestAuth {
            inner: self.inner.clone(),
        }))
    }

    fn object_store(&self) -> Option<Arc<dyn ObjectStore>> {
        Some(Arc::new(RestObjectStore))
    }

    fn messaging(&self) -> Option<Arc<dyn Messaging>> {
        // The REST reference backend carries no messaging capability
        None
    }
}

struct RestDataStore {
    inner: Arc<Inner>,
}

#[async_trait]
impl DataStore for RestDataStore {
    async fn configure_transport(&self, options: TransportOptions) -> Result<(), BackendError> {
        if self.inner.started.load(Ordering::SeqCst) {
            return Err(BackendError::Settings {
                reason: "data store has already been started and its settings can no longer be changed"
                    .to_string(),
            });
        }
        if let Ok(mut transport) = self.inner.transport.lock() {
            *transport = options;
        }
        Ok(())
    }

    async fn read_sentinel(&self) -> Result<serde_json::Value, BackendError> {
        let (client, config) = self.inner.request_context()?;
        self.inner.ensure_network()?;
        self.inner.started.store(true, Ordering::SeqCst);

        let url = Inner::sentinel_url(&config);
        let response = timeout(
            Duration::from_secs(config.request_timeout_seconds),
            client.get(&url).header("x-api-key", &config.api_key).send(),
        )
        .await
        .map_err(|_| BackendError::Network {
            reason: "sentinel read timed out".to_string(),
        })?
        .map_err(|e| BackendError::Network {
            reason: format!("sentinel read failed: {}", e),
        })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound {
                path: config.sentinel_path.clone(),
            });
        }

        if !response.status().is_success() {
            return Err(BackendError::Network {
                reason: format!("sentinel read returned status {}", response.status()),
            });
        }

        let value: serde_json::Value = response.json().await.map_err(|e| BackendError::Network {
            reason: format!("invalid sentinel payload: {}", e),
        })?;

        if let Ok(mut cache) = self.inner.cache.lock() {
            cache.insert(config.sentinel_path.clone(), value.clone());
        }

        Ok(value)
    }

    async fn write_sentinel(&self, value: serde_json::Value) -> Result<(), BackendError> {
        let (client, config) = self.inner.request_context()?;
        self.inner.ensure_network()?;
        self.inner.started.store(true, Ordering::SeqCst);

        let token = self.inner.verification.token().await?;
        let url = Inner::sentinel_url(&config);
        let mut request = client
            .patch(&url)
            .header("x-api-key", &config.api_key)
            .json(&value);
        if !token.is_empty() {
            request = request.header("x-verification-token", token);
        }

        let response = timeout(
            Duration::from_secs(config.request_timeout_seconds),
            request.send(),
        )
        .await
        .map_err(|_| BackendError::Network {
            reason: "sentinel write timed out".to_string(),
        })?
        .map_err(|e| BackendError::Network {
            reason: format!("sentinel write failed: {}", e),
        })?;

        if !response.status().is_success() {
            return Err(BackendError::Network {
                reason: format!("sentinel write returned status {}", response.status()),
            });
        }

        if let Ok(mut cache) = self.inner.cache.lock() {
            cache.insert(config.sentinel_path.clone(), value);
        }

        Ok(())
    }

    async fn disable_network(&self) -> Result<(), BackendError> {
        self.inner.network_enabled.store(false, Ordering::SeqCst);
        debug!("Backend network transport disabled");
        Ok(())
    }

    async fn enable_network(&self) -> Result<(), BackendError> {
        self.inner.network_enabled.store(true, Ordering::SeqCst);
        debug!("Backend network transport enabled");
        Ok(())
    }

    async fn clear_local_cache(&self) -> Result<(), BackendError> {
        let cleared = match self.inner.cache.lock() {
            Ok(mut cache) => {
                let count = cache.len();
                cache.clear();
                count
            }
            Err(_) => {
                return Err(BackendError::Settings {
                    reason: "local cache is unavailable".to_string(),
                })
            }
        };
        debug!("Cleared {} locally cached records", cleared);
        Ok(())
    }
}

struct RestAuth {
    inner: Arc<Inner>,
}

#[async_trait]
impl Auth for RestAuth {
    async fn current_session(&self) -> Option<String> {
        self.inner.session.lock().ok().and_then(|s| s.clone())
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        if let Ok(mut session) = self.inner.session.lock() {
            if session.take().is_some() {
                debug!("Backend session cleared");
            }
        }
        if let Ok(mut cache) = self.inner.cache.lock() {
            cache.clear();
        } else {
            warn!("Could not clear local cache during sign-out");
        }
        Ok(())
    }
}

struct RestObjectStore;

impl ObjectStore for RestObjectStore {}
