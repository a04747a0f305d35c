use super::Config;
use anyhow::{anyhow, Result};
use std::sync::Arc;
use tokio::fs;
use tracing::info;

#[derive(Debug)]
pub struct ConfigManager {
    current_config: Arc<Config>,
}

impl ConfigManager {
    pub async fn new(config_dir: String) -> Result<Self> {
        let config = Self::load_configuration(&config_dir).await?;
        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    pub fn get_current_config(&self) -> Arc<Config> {
        self.current_config.clone()
    }

    async fn load_configuration(config_dir: &str) -> Result<Config> {
        let config_path = format!("{}/main.toml", config_dir);
        let content = fs::read_to_string(&config_path)
            .await
            .map_err(|e| anyhow!("Failed to read config {}: {}", config_path, e))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| anyhow!("Failed to parse config: {}", e))?;

        if config.backend.base_url.is_empty() {
            return Err(anyhow!("backend.base_url must not be empty"));
        }

        info!(
            "Configuration loaded: {} probe targets, backend project '{}'",
            config.probes.len(),
            config.backend.project_id
        );

        Ok(config)
    }
}
