// src/core/scanner/brute_force.rs

use std::collections::BTreeSet;

use tracing::{debug, info};

use super::ActiveScanner;
use crate::core::models::{Scheme, preferred_probe};
use crate::core::passive::is_candidate;

/// Turns wordlist prefixes into candidate names under `target`.
///
/// Prefixes are trimmed and lowercased; anything that would not produce a valid
/// candidate (wildcards, embedded whitespace, empty labels) is skipped.
pub fn expand_prefixes<'a>(
    target: &'a str,
    prefixes: &'a [String],
) -> impl Iterator<Item = String> + 'a {
    prefixes.iter().filter_map(move |prefix| {
        let prefix = prefix.trim().trim_matches('.').to_ascii_lowercase();
        if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
            return None;
        }
        let name = format!("{prefix}.{target}");
        is_candidate(&name, target).then_some(name)
    })
}

impl ActiveScanner {
    /// Guesses `prefix.target` for every prefix and keeps the names that resolve.
    ///
    /// With `require_http` set, a resolved name must also answer on HTTP or HTTPS
    /// to be kept. HTTPS is tried first; HTTP only when HTTPS stays silent.
    pub async fn brute_force(
        &self,
        target: &str,
        prefixes: &[String],
        require_http: bool,
    ) -> BTreeSet<String> {
        let candidates: BTreeSet<String> = expand_prefixes(target, prefixes).collect();
        info!(target, candidates = candidates.len(), "Starting brute-force resolution.");

        let resolver = self.resolver.clone();
        let resolved: BTreeSet<String> = super::fan_out(candidates, self.ceiling, move |name| {
            let resolver = resolver.clone();
            async move { resolver.resolve(&name).await }
        })
        .await
        .into_iter()
        .filter_map(|(name, ip)| ip.map(|_| name))
        .collect();

        debug!(target, resolved = resolved.len(), "Brute-force resolution finished.");
        if !require_http || resolved.is_empty() {
            info!(target, confirmed = resolved.len(), "Brute force finished.");
            return resolved;
        }

        let prober = self.prober.clone();
        let confirmed: BTreeSet<String> = super::fan_out(resolved, self.ceiling, move |name| {
            let prober = prober.clone();
            async move {
                let https = prober.probe(&name, Scheme::Https).await;
                let http = match https {
                    Some(_) => None,
                    None => prober.probe(&name, Scheme::Http).await,
                };
                preferred_probe(http.as_ref(), https.as_ref()).map(|_| ())
            }
        })
        .await
        .into_iter()
        .filter_map(|(name, live)| live.map(|_| name))
        .collect();

        info!(target, confirmed = confirmed.len(), "Brute force finished.");
        confirmed
    }
}
