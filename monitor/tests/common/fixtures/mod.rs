//! Reusable test utilities:
//! - Scriptable in-process backend fake with call-order recording
//! - Mock HTTP backend (wiremock)
//! - Test configuration builder

// Allow unused code in test fixtures - they are utilities shared across test binaries
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod mock_backend_http;
pub mod scripted_backend;
pub mod test_config;

// Re-export commonly used items
pub use mock_backend_http::MockBackendServer;
pub use scripted_backend::{CountingInitHook, ScriptedBackend};
pub use test_config::TestConfigBuilder;
