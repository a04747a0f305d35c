pub mod handlers;
pub mod server;

pub use server::start_web_server;

use std::sync::Arc;

use crate::config::Config;
use crate::health::ConnectionMonitor;
use crate::loader::BundleLoader;

// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub monitor: ConnectionMonitor,
    pub loader: Arc<BundleLoader>,
    pub probe_client: reqwest::Client,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        monitor: ConnectionMonitor,
        loader: Arc<BundleLoader>,
        probe_client: reqwest::Client,
    ) -> Self {
        Self {
            config,
            monitor,
            loader,
            probe_client,
        }
    }
}
