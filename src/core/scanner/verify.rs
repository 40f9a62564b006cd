// src/core/scanner/verify.rs

use tracing::{info, warn};

use super::ActiveScanner;
use crate::core::models::{ProbeResult, Scheme};

impl ActiveScanner {
    /// Attaches DNS and HTTP/HTTPS detail to every candidate name.
    ///
    /// Both schemes are probed even when the name does not resolve, since a host
    /// can answer behind load balancing the resolver does not see. Each candidate
    /// holds one concurrency ticket and runs its resolve, HTTPS probe and HTTP
    /// probe in turn, so no more than `ceiling` network operations are in flight.
    ///
    /// # Returns
    /// One `ProbeResult` per distinct input name, in input order.
    pub async fn verify(&self, target: &str, names: &[String]) -> Vec<ProbeResult> {
        info!(target, candidates = names.len(), "Starting verification.");

        let resolver = self.resolver.clone();
        let prober = self.prober.clone();
        let mut details = super::fan_out(names.iter().cloned(), self.ceiling, move |name| {
            let resolver = resolver.clone();
            let prober = prober.clone();
            async move {
                let ip = resolver.resolve(&name).await;
                let https = prober.probe(&name, Scheme::Https).await;
                let http = prober.probe(&name, Scheme::Http).await;
                Some(ProbeResult::from_observations(name, ip, http.as_ref(), https.as_ref()))
            }
        })
        .await;

        let mut results = Vec::with_capacity(details.len());
        for name in names {
            // Duplicates in the input were collapsed by the fan-out.
            let Some(detail) = details.remove(name) else { continue };
            let result = detail.unwrap_or_else(|| {
                warn!(target = %name, "No detail collected, recording an empty result.");
                ProbeResult::unobserved(name.clone())
            });
            results.push(result);
        }

        let live = results
            .iter()
            .filter(|r| r.http_status.is_some() || r.https_status.is_some())
            .count();
        info!(target, verified = results.len(), live, "Verification finished.");
        results
    }
}
