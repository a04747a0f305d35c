use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

mod backend;
mod config;
mod constants;
mod errors;
mod health;
mod loader;
mod web;

use backend::{
    BackendHandle, ConfigInitHook, NoopVerification, RestBackend, StaticTokenVerification,
    VerificationStrategy,
};
use config::ConfigManager;
use health::{ConnectionMonitor, ProbeTarget};
use loader::BundleLoader;
use web::{start_web_server, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging with reduced verbosity
    let env_filter = EnvFilter::from_default_env()
        .add_directive("monitor=info".parse()?)
        .add_directive("tower_http=warn".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    fmt().with_env_filter(env_filter).init();

    info!("Starting Backend Connection Monitor");

    // Load configuration
    let config_manager = ConfigManager::new("config".to_string()).await?;
    let config = config_manager.get_current_config();

    // Verification strategy is supplied by the environment, never patched in
    let verification: Arc<dyn VerificationStrategy> =
        match &config.backend.verification_token {
            Some(token) => {
                info!("Using static verification token from configuration");
                Arc::new(StaticTokenVerification::new(token.clone()))
            }
            None => Arc::new(NoopVerification),
        };

    // Single process-wide backend handle; the monitor only ever
    // reconfigures it, never constructs a second one
    let backend: Arc<dyn BackendHandle> = Arc::new(RestBackend::new(verification));
    let init_hook = Arc::new(ConfigInitHook::new(backend.clone(), config.backend.clone()));

    let monitor = ConnectionMonitor::new(config.clone(), backend, Some(init_hook));
    info!("Connection monitor initialized");

    let probe_client = reqwest::Client::new();
    let loader = Arc::new(BundleLoader::new(probe_client.clone()));

    let probe_targets: Vec<ProbeTarget> = config
        .probes
        .iter()
        .map(|p| ProbeTarget {
            url: p.url.clone(),
            label: p.label.clone(),
        })
        .collect();

    // Health checks at two fixed delays after startup, tolerating late
    // backend initialization, then optionally on a periodic interval.
    // Every scheduled check starts with a fresh probe sweep.
    let monitor_clone = monitor.clone();
    let sweep_client = probe_client.clone();
    let targets = probe_targets;
    let initial_delay = config.initial_check_delay_seconds;
    let second_delay = config.second_check_delay_seconds;
    let check_interval = config.check_interval_seconds;
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_secs(initial_delay)).await;
        if let Err(e) = monitor_clone.run_scheduled_check(&sweep_client, &targets).await {
            warn!("Initial health check error: {}", e);
        }

        let remaining = second_delay.saturating_sub(initial_delay);
        tokio::time::sleep(std::time::Duration::from_secs(remaining)).await;
        if let Err(e) = monitor_clone.run_scheduled_check(&sweep_client, &targets).await {
            warn!("Second health check error: {}", e);
        }

        if check_interval == 0 {
            return;
        }
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(check_interval));
        interval.tick().await;
        loop {
            interval.tick().await;
            if let Err(e) = monitor_clone.run_scheduled_check(&sweep_client, &targets).await {
                warn!("Periodic health check error: {}", e);
            }
        }
    });
    info!(
        "Health checks scheduled at {}s and {}s after startup (interval: {}s)",
        initial_delay, second_delay, check_interval
    );

    // Inject the configured application bundle once, if any
    if let Some(bundle) = &config.bundle {
        let loader_clone = loader.clone();
        let url = bundle.url.clone();
        tokio::spawn(async move {
            match loader_clone.inject(&url).await {
                Ok(bundle) => info!(
                    "Application bundle ready: {} ({} bytes)",
                    bundle.url,
                    bundle.size_bytes()
                ),
                Err(e) => error!("Application bundle failed to load: {}", e),
            }
        });
    }

    // Start diagnostics API
    let state = AppState::new(config, monitor, loader, probe_client);
    start_web_server(state).await?;

    Ok(())
}
