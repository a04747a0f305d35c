//! Endpoint reachability probes
//!
//! Best-effort, side-effect-free HEAD requests against the fixed probe
//! targets. Purely diagnostic: outcomes feed logs and the diagnostics API,
//! never application logic.

use futures::stream::{self, Stream, StreamExt};
use reqwest::Client as HttpClient;
use tokio::time::timeout;
use tracing::{info, warn};

use super::types::{ProbeOutcome, ProbeTarget};
use crate::constants::http;

/// Maximum probes in flight at once
const PROBE_CONCURRENCY: usize = 8;

/// Probe each target independently, yielding outcomes as they complete.
/// Every failure mode classifies as `Unreachable`; nothing propagates.
pub fn probe_endpoints(
    client: HttpClient,
    targets: Vec<ProbeTarget>,
) -> impl Stream<Item = (ProbeTarget, ProbeOutcome)> {
    stream::iter(targets)
        .map(move |target| {
            let client = client.clone();
            async move {
                let outcome = probe_one(&client, &target).await;
                (target, outcome)
            }
        })
        .buffer_unordered(PROBE_CONCURRENCY)
}

/// Run a full probe sweep, logging each outcome.
pub async fn run_probe_sweep(
    client: &HttpClient,
    targets: &[ProbeTarget],
) -> Vec<(ProbeTarget, ProbeOutcome)> {
    let results: Vec<_> = probe_endpoints(client.clone(), targets.to_vec())
        .collect()
        .await;

    for (target, outcome) in &results {
        match outcome {
            ProbeOutcome::Reachable => {
                info!("Probe target '{}' is reachable", target.label);
            }
            ProbeOutcome::Unreachable => {
                warn!("Probe target '{}' is unreachable ({})", target.label, target.url);
            }
        }
    }

    results
}

async fn probe_one(client: &HttpClient, target: &ProbeTarget) -> ProbeOutcome {
    let request = client.head(&target.url).send();

    match timeout(http::PROBE_TIMEOUT, request).await {
        Ok(Ok(_response)) => ProbeOutcome::Reachable,
        Ok(Err(_)) | Err(_) => ProbeOutcome::Unreachable,
    }
}
