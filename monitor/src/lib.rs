pub mod backend;
pub mod config;
pub mod constants;
pub mod errors;
pub mod health;
pub mod loader;
pub mod web;

// Re-export commonly used types
pub use backend::{BackendHandle, RestBackend};
pub use config::{BackendConfig, Config, ConfigManager};
pub use health::{BackendStatus, ConnectionMonitor, ConnectionState, RecoveryAttempt};
pub use loader::BundleLoader;
