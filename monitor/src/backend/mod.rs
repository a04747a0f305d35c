//! Backend capability contracts
//!
//! The monitor never reaches for a global SDK object; it is handed an
//! `Arc<dyn BackendHandle>` at construction and only ever reconfigures that
//! one handle. Every sub-capability is independently optional, and every
//! method folds remote failures into [`BackendError`] at the boundary.

pub mod rest;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::BackendConfig;
use crate::errors::BackendError;

pub use rest::RestBackend;

/// The single client object representing a connection to the remote
/// managed-backend service.
#[async_trait]
pub trait BackendHandle: Send + Sync {
    fn is_initialized(&self) -> bool;

    /// Create/configure the underlying client. Configuration is opaque;
    /// re-applying the full configuration must be idempotent.
    async fn initialize(&self, config: &BackendConfig) -> Result<(), BackendError>;

    fn data_store(&self) -> Option<Arc<dyn DataStore>>;
    fn auth(&self) -> Option<Arc<dyn Auth>>;
    fn object_store(&self) -> Option<Arc<dyn ObjectStore>>;
    fn messaging(&self) -> Option<Arc<dyn Messaging>>;
}

/// Data store sub-capability: sentinel round-trips, network control, cache.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Apply transport options. May fail with a settings error once the
    /// store has started serving operations.
    async fn configure_transport(&self, options: TransportOptions) -> Result<(), BackendError>;

    /// Read the well-known sentinel record. Fails with `NotFound` when the
    /// backend answered but the record does not exist, `Network` otherwise.
    async fn read_sentinel(&self) -> Result<serde_json::Value, BackendError>;

    async fn write_sentinel(&self, value: serde_json::Value) -> Result<(), BackendError>;

    async fn disable_network(&self) -> Result<(), BackendError>;

    async fn enable_network(&self) -> Result<(), BackendError>;

    /// Drop all locally persisted backend state. May fail while the store
    /// is actively serving operations.
    async fn clear_local_cache(&self) -> Result<(), BackendError>;
}

/// Auth sub-capability.
#[async_trait]
pub trait Auth: Send + Sync {
    async fn current_session(&self) -> Option<String>;

    async fn sign_out(&self) -> Result<(), BackendError>;
}

/// Object storage sub-capability. Availability is determined by presence
/// alone; no operations are part of the monitored surface.
pub trait ObjectStore: Send + Sync {}

/// Messaging sub-capability, presence-checked only.
pub trait Messaging: Send + Sync {}

/// Initialization callback invoked by `check_health` when no handle exists.
#[async_trait]
pub trait InitHook: Send + Sync {
    async fn initialize(&self) -> Result<(), BackendError>;
}

/// Pluggable verification token provider.
///
/// Replaces runtime method rewriting of the client's verification flow: the
/// host or test environment supplies whichever strategy it needs.
#[async_trait]
pub trait VerificationStrategy: Send + Sync {
    /// Produce a verification token, or an empty string when verification
    /// is not in use.
    async fn token(&self) -> Result<String, BackendError>;
}

/// Fixed-token verification supplied by the host environment.
pub struct StaticTokenVerification {
    token: String,
}

impl StaticTokenVerification {
    pub fn new(token: String) -> Self {
        Self { token }
    }
}

#[async_trait]
impl VerificationStrategy for StaticTokenVerification {
    async fn token(&self) -> Result<String, BackendError> {
        Ok(self.token.clone())
    }
}

/// Verification disabled; writes carry no token.
pub struct NoopVerification;

#[async_trait]
impl VerificationStrategy for NoopVerification {
    async fn token(&self) -> Result<String, BackendError> {
        Ok(String::new())
    }
}

/// Transport options applied by recovery step 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportOptions {
    /// Force the conservative fallback transport instead of streaming
    pub force_fallback: bool,
    /// Lift the local cache size limit
    pub unlimited_cache: bool,
}

impl TransportOptions {
    /// The conservative/compatible mode recovery falls back to.
    pub fn fallback() -> Self {
        Self {
            force_fallback: true,
            unlimited_cache: true,
        }
    }
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            force_fallback: false,
            unlimited_cache: false,
        }
    }
}

/// Default init hook: re-applies the full opaque configuration to the handle.
pub struct ConfigInitHook {
    handle: Arc<dyn BackendHandle>,
    config: BackendConfig,
}

impl ConfigInitHook {
    pub fn new(handle: Arc<dyn BackendHandle>, config: BackendConfig) -> Self {
        Self { handle, config }
    }
}

#[async_trait]
impl InitHook for ConfigInitHook {
    async fn initialize(&self) -> Result<(), BackendError> {
        self.handle.initialize(&self.config).await
    }
}
