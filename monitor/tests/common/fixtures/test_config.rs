//! Test configuration builder with short timeouts

use std::sync::Arc;

use monitor::config::{BackendConfig, Config, ProbeTargetConfig};

pub struct TestConfigBuilder {
    config: Config,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config {
                host: "127.0.0.1".to_string(),
                port: 0,
                initial_check_delay_seconds: 0,
                second_check_delay_seconds: 0,
                check_interval_seconds: 0,
                recovery_step_timeout_seconds: 2,
                benign_error_markers: None,
                recovery_error_markers: None,
                probes: Vec::new(),
                backend: BackendConfig {
                    base_url: "http://127.0.0.1:9".to_string(),
                    api_key: "test-key".to_string(),
                    project_id: "test-project".to_string(),
                    sentinel_path: "system/connection_test".to_string(),
                    request_timeout_seconds: 2,
                    verification_token: None,
                },
                bundle: None,
            },
        }
    }

    pub fn with_backend_url(mut self, base_url: &str) -> Self {
        self.config.backend.base_url = base_url.to_string();
        self
    }

    pub fn with_verification_token(mut self, token: &str) -> Self {
        self.config.backend.verification_token = Some(token.to_string());
        self
    }

    pub fn with_probe(mut self, url: &str, label: &str) -> Self {
        self.config.probes.push(ProbeTargetConfig {
            url: url.to_string(),
            label: label.to_string(),
        });
        self
    }

    pub fn with_markers(mut self, benign: Vec<String>, recoverable: Vec<String>) -> Self {
        self.config.benign_error_markers = Some(benign);
        self.config.recovery_error_markers = Some(recoverable);
        self
    }

    pub fn with_recovery_step_timeout(mut self, seconds: u64) -> Self {
        self.config.recovery_step_timeout_seconds = seconds;
        self
    }

    pub fn build(self) -> Arc<Config> {
        Arc::new(self.config)
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
