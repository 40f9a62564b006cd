// src/core/scanner/fan_out.rs

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Runs `op` once for every name with at most `ceiling` operations in flight.
///
/// A semaphore permit is acquired before each task is launched and moved into
/// the task, so it is released when the task ends whichever way it ends,
/// including a panic. The call only returns once every task has finished.
///
/// # Returns
/// A map holding exactly one entry per distinct input name. `None` marks a name
/// whose operation reported absence or whose task died.
pub async fn fan_out<T, F, Fut>(
    names: impl IntoIterator<Item = String>,
    ceiling: usize,
    op: F,
) -> HashMap<String, Option<T>>
where
    T: Send + 'static,
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<T>> + Send + 'static,
{
    let ceiling = ceiling.max(1);
    let semaphore = Arc::new(Semaphore::new(ceiling));
    let op = Arc::new(op);

    let mut seen = HashSet::new();
    let unique: Vec<String> = names.into_iter().filter(|name| seen.insert(name.clone())).collect();

    let mut tasks = JoinSet::new();
    for name in &unique {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };
        let op = op.clone();
        let name = name.clone();
        tasks.spawn(async move {
            let _permit = permit;
            let outcome = AssertUnwindSafe(op(name.clone())).catch_unwind().await;
            if outcome.is_err() {
                warn!(target = %name, "Fan-out task panicked, recording absence.");
            }
            (name, outcome.ok().flatten())
        });
    }

    debug!(tasks = tasks.len(), ceiling, "All fan-out tasks launched.");

    let mut results = HashMap::with_capacity(unique.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((name, outcome)) => {
                results.insert(name, outcome);
            }
            Err(e) => warn!(error = %e, "Fan-out task did not complete."),
        }
    }

    // Names whose task never reported back are absent, not missing.
    for name in unique {
        results.entry(name).or_insert(None);
    }
    results
}
