// src/core/passive/mod.rs

// Passive enumeration: collecting candidate names from third-party data sources
// without sending any traffic to the target itself.
pub mod sources;

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::core::error::SourceError;

pub use self::sources::default_sources;

/// A third-party provider of raw host names for a domain.
#[async_trait]
pub trait PassiveSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, domain: &str) -> Result<Vec<String>, SourceError>;
}

// A single DNS label; underscores are tolerated since service names use them.
static RE_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_](?:[a-z0-9_-]{0,61}[a-z0-9_])?$").unwrap());

/// Returns true when `name` is a proper subdomain of `target`.
///
/// Both arguments are expected in lowercase. The apex itself, wildcard entries,
/// and names outside `target` are rejected, as are names with empty or
/// malformed labels.
pub fn is_candidate(name: &str, target: &str) -> bool {
    if name == target || name.contains('*') {
        return false;
    }
    let Some(prefix) = name.strip_suffix(target).and_then(|p| p.strip_suffix('.')) else {
        return false;
    };
    !prefix.is_empty() && prefix.split('.').all(|label| RE_LABEL.is_match(label))
}

/// Normalizes one raw entry from a source into a candidate name.
///
/// An entry is a single record: only its first whitespace-delimited token is
/// considered, anything after it is treated as trailing garbage. Sources that
/// legitimately pack several names into one field split them before returning.
pub fn normalize(raw: &str, target: &str) -> Option<String> {
    let token = raw.split_whitespace().next()?;
    let name = token.trim_end_matches('.').to_ascii_lowercase();
    is_candidate(&name, target).then_some(name)
}

/// Filters and deduplicates raw source output for `target`.
pub fn filter_candidates<I, S>(raw: I, target: &str) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let target = target.trim_end_matches('.').to_ascii_lowercase();
    raw.into_iter()
        .filter_map(|entry| normalize(entry.as_ref(), &target))
        .collect()
}

/// Runs every passive source and merges what they return.
#[derive(Clone, Default)]
pub struct PassiveAggregator {
    sources: Vec<Arc<dyn PassiveSource>>,
}

impl PassiveAggregator {
    pub fn new(sources: Vec<Arc<dyn PassiveSource>>) -> Self {
        Self { sources }
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Queries all sources concurrently and returns the filtered union.
    ///
    /// A source that fails is logged and counted as having found nothing; this
    /// step never fails as a whole.
    pub async fn aggregate(&self, target: &str) -> BTreeSet<String> {
        info!(target, sources = self.sources.len(), "Starting passive enumeration.");

        let lookups = self.sources.iter().map(|source| async move {
            let outcome = source.fetch(target).await;
            (source.name(), outcome)
        });

        let mut raw = Vec::new();
        for (source, outcome) in join_all(lookups).await {
            match outcome {
                Ok(names) => {
                    debug!(source, found = names.len(), "Passive source answered.");
                    raw.extend(names);
                }
                Err(e) => {
                    warn!(source, target, error = %e, "Passive source failed, ignoring it.");
                }
            }
        }

        let candidates = filter_candidates(&raw, target);
        info!(target, raw = raw.len(), candidates = candidates.len(), "Passive enumeration finished.");
        candidates
    }
}
