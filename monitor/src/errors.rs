//! Custom error types for the connection monitor
//!
//! Provides structured error handling with context for different failure scenarios.

use std::fmt;

/// Main error type for the connection monitor
#[derive(Debug)]
pub enum MonitorError {
    /// Configuration-related errors
    Config(ConfigError),

    /// Backend capability errors (sentinel reads, network control, cache)
    Backend(BackendError),

    /// Recovery sequence errors
    Recovery(RecoveryError),

    /// Application bundle loading errors
    Load(LoadError),

    /// Other errors with context
    Other(String),
}

/// Configuration error variants
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to load configuration file
    LoadFailed { path: String, reason: String },

    /// Invalid configuration value
    InvalidValue { field: String, reason: String },

    /// Configuration parsing error
    ParseError { reason: String },
}

/// Backend capability error variants
///
/// These are the only failures the capability traits may surface; everything
/// the remote side throws is folded into one of them at the boundary.
#[derive(Debug, Clone)]
pub enum BackendError {
    /// Sentinel record does not exist (the backend answered, so the
    /// round-trip itself succeeded)
    NotFound { path: String },

    /// Network-level failure reaching the backend
    Network { reason: String },

    /// A requested service capability is not present on the handle
    Unavailable { service: String },

    /// Settings rejected by the backend client
    Settings { reason: String },

    /// Operation attempted before the handle was initialized
    NotInitialized,
}

/// Recovery sequence error variants
#[derive(Debug)]
pub enum RecoveryError {
    /// A single recovery step failed
    StepFailed { step: u8, reason: String },

    /// All recovery steps ran and the backend is still unreachable
    Exhausted { reason: String },
}

/// Bundle loading error variants
///
/// Cloneable because a single in-flight load fans its result out to every
/// waiting caller.
#[derive(Debug, Clone)]
pub enum LoadError {
    /// Fetching the bundle failed at the network level
    Network { url: String, reason: String },

    /// The fetched payload is not a usable bundle
    InvalidBundle { url: String, reason: String },
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorError::Config(e) => write!(f, "Configuration error: {}", e),
            MonitorError::Backend(e) => write!(f, "Backend error: {}", e),
            MonitorError::Recovery(e) => write!(f, "Recovery error: {}", e),
            MonitorError::Load(e) => write!(f, "Bundle load error: {}", e),
            MonitorError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::LoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path, reason)
            }
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
            ConfigError::ParseError { reason } => {
                write!(f, "Failed to parse config: {}", reason)
            }
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::NotFound { path } => {
                write!(f, "Record '{}' not found", path)
            }
            BackendError::Network { reason } => {
                write!(f, "Network error: {}", reason)
            }
            BackendError::Unavailable { service } => {
                write!(f, "Service '{}' is not available on this handle", service)
            }
            BackendError::Settings { reason } => {
                write!(f, "Settings error: {}", reason)
            }
            BackendError::NotInitialized => {
                write!(f, "Backend handle is not initialized")
            }
        }
    }
}

impl fmt::Display for RecoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryError::StepFailed { step, reason } => {
                write!(f, "Recovery step {} failed: {}", step, reason)
            }
            RecoveryError::Exhausted { reason } => {
                write!(f, "Recovery steps exhausted: {}", reason)
            }
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Network { url, reason } => {
                write!(f, "Failed to fetch bundle '{}': {}", url, reason)
            }
            LoadError::InvalidBundle { url, reason } => {
                write!(f, "Invalid bundle '{}': {}", url, reason)
            }
        }
    }
}

impl std::error::Error for MonitorError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for BackendError {}
impl std::error::Error for RecoveryError {}
impl std::error::Error for LoadError {}

// Conversions from anyhow::Error for gradual migration
impl From<anyhow::Error> for MonitorError {
    fn from(err: anyhow::Error) -> Self {
        MonitorError::Other(err.to_string())
    }
}

// Conversion helpers for sub-errors
impl From<ConfigError> for MonitorError {
    fn from(err: ConfigError) -> Self {
        MonitorError::Config(err)
    }
}

impl From<BackendError> for MonitorError {
    fn from(err: BackendError) -> Self {
        MonitorError::Backend(err)
    }
}

impl From<RecoveryError> for MonitorError {
    fn from(err: RecoveryError) -> Self {
        MonitorError::Recovery(err)
    }
}

impl From<LoadError> for MonitorError {
    fn from(err: LoadError) -> Self {
        MonitorError::Load(err)
    }
}
