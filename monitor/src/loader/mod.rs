//! One-shot application bundle loader
//!
//! Single-flight: concurrent injection requests for the same URL share one
//! in-flight fetch, and every waiter receives the same resolution. Completed
//! bundles are cached so a bundle is fetched at most once per process.

use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::Client as HttpClient;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::constants::http;
use crate::errors::LoadError;

/// A fetched application bundle, the loader's entry-point handle.
#[derive(Debug, Clone)]
pub struct Bundle {
    pub url: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Bundle {
    pub fn size_bytes(&self) -> usize {
        self.body.len()
    }
}

type InFlightLoad = Shared<BoxFuture<'static, Result<Arc<Bundle>, LoadError>>>;

pub struct BundleLoader {
    client: HttpClient,
    /// url -> pending fetch; entries removed once resolved or rejected
    in_flight: Mutex<HashMap<String, InFlightLoad>>,
    /// url -> completed bundle (one-shot: never refetched)
    loaded: Mutex<HashMap<String, Arc<Bundle>>>,
}

impl BundleLoader {
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            in_flight: Mutex::new(HashMap::new()),
            loaded: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch the bundle at `url`, deduplicating concurrent requests: all
    /// callers for an in-flight URL share the same result.
    pub async fn inject(&self, url: &str) -> Result<Arc<Bundle>, LoadError> {
        if let Some(bundle) = self.loaded.lock().await.get(url) {
            debug!("Bundle '{}' already loaded, serving from cache", url);
            return Ok(bundle.clone());
        }

        let (load, owner) = {
            let mut in_flight = self.in_flight.lock().await;
            match in_flight.get(url) {
                Some(existing) => (existing.clone(), false),
                None => {
                    let load = fetch_bundle(self.client.clone(), url.to_string())
                        .boxed()
                        .shared();
                    in_flight.insert(url.to_string(), load.clone());
                    (load, true)
                }
            }
        };

        if !owner {
            debug!("Joining in-flight load for bundle '{}'", url);
        }

        let result = load.await;

        if owner {
            self.in_flight.lock().await.remove(url);
            match &result {
                Ok(bundle) => {
                    self.loaded
                        .lock()
                        .await
                        .insert(url.to_string(), bundle.clone());
                    info!("Bundle '{}' loaded ({} bytes)", url, bundle.size_bytes());
                }
                Err(e) => warn!("{}", e),
            }
        }

        result
    }
}

async fn fetch_bundle(client: HttpClient, url: String) -> Result<Arc<Bundle>, LoadError> {
    let response = timeout(http::BUNDLE_TIMEOUT, client.get(&url).send())
        .await
        .map_err(|_| LoadError::Network {
            url: url.clone(),
            reason: "bundle fetch timed out".to_string(),
        })?
        .map_err(|e| LoadError::Network {
            url: url.clone(),
            reason: e.to_string(),
        })?;

    if !response.status().is_success() {
        return Err(LoadError::Network {
            url: url.clone(),
            reason: format!("bundle fetch returned status {}", response.status()),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    let body = response
        .bytes()
        .await
        .map_err(|e| LoadError::Network {
            url: url.clone(),
            reason: format!("bundle body read failed: {}", e),
        })?
        .to_vec();

    if body.is_empty() {
        return Err(LoadError::InvalidBundle {
            url,
            reason: "bundle payload is empty".to_string(),
        });
    }

    Ok(Arc::new(Bundle {
        url,
        content_type,
        body,
    }))
}
