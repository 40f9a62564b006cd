// src/core/registry.rs

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::core::error::ReconError;
use crate::core::models::{PhaseMark, ProbeResult, ScanJob, ScanStatus};

/// Process-wide store of scan jobs.
///
/// Cloning the registry shares the same underlying map. The orchestrator running
/// a job is its only writer; request handlers only read.
#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
    jobs: Arc<RwLock<HashMap<String, ScanJob>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new queued job for `domain` and returns its id.
    ///
    /// Ids have the form `<domain with '_' for '.'>_<unix seconds>`; a numeric
    /// suffix is appended when the same domain is submitted twice in one second.
    pub async fn create(&self, domain: &str) -> String {
        let base = format!("{}_{}", domain.replace('.', "_"), Utc::now().timestamp());
        let mut jobs = self.jobs.write().await;

        let mut id = base.clone();
        let mut suffix = 1;
        while jobs.contains_key(&id) {
            id = format!("{base}_{suffix}");
            suffix += 1;
        }

        jobs.insert(id.clone(), ScanJob::new(id.clone(), domain.to_string()));
        info!(scan_id = %id, domain, "Scan job created.");
        id
    }

    pub async fn get(&self, id: &str) -> Option<ScanJob> {
        self.jobs.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }

    /// Moves a running job into `status`. Progress never goes backwards.
    pub async fn advance(&self, id: &str, status: ScanStatus, progress: u8) -> Result<(), ReconError> {
        self.update(id, |job| {
            job.status = status;
            job.progress = job.progress.max(progress.min(100));
        })
        .await
    }

    /// Publishes the final results and marks the job completed.
    pub async fn complete(&self, id: &str, results: Vec<ProbeResult>) -> Result<(), ReconError> {
        self.update(id, |job| {
            job.count = results.len();
            job.results = results;
            job.status = ScanStatus::Completed;
            job.progress = 100;
        })
        .await
    }

    /// Marks the job failed with `error` as its description.
    pub async fn fail(&self, id: &str, error: impl Into<String>) -> Result<(), ReconError> {
        let error = error.into();
        self.update(id, |job| {
            job.status = ScanStatus::Failed;
            job.error = Some(error);
        })
        .await
    }

    async fn update<F>(&self, id: &str, apply: F) -> Result<(), ReconError>
    where
        F: FnOnce(&mut ScanJob),
    {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(id)
            .ok_or_else(|| ReconError::UnknownJob(id.to_string()))?;

        if job.status.is_terminal() {
            warn!(scan_id = id, status = %job.status, "Refusing to modify a finished job.");
            return Err(ReconError::JobFinalized { id: id.to_string(), status: job.status });
        }

        apply(job);
        let now = Utc::now();
        job.updated_at = now;
        job.timeline.push(PhaseMark { status: job.status, progress: job.progress, at: now });
        debug!(job = %job, "Scan job updated.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ids_are_unique_and_url_safe() {
        let registry = JobRegistry::new();
        let first = registry.create("example.com").await;
        let second = registry.create("example.com").await;
        assert_ne!(first, second);
        assert!(first.starts_with("example_com_"));
        assert!(first.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn new_jobs_are_queued() {
        let registry = JobRegistry::new();
        let id = registry.create("example.com").await;
        let job = registry.get(&id).await.unwrap();
        assert_eq!(job.status, ScanStatus::Queued);
        assert_eq!(job.progress, 0);
        assert_eq!(job.domain, "example.com");
    }

    #[tokio::test]
    async fn progress_is_monotonic_and_recorded() {
        let registry = JobRegistry::new();
        let id = registry.create("example.com").await;
        registry.advance(&id, ScanStatus::PassiveEnumeration, 10).await.unwrap();
        registry.advance(&id, ScanStatus::Verification, 70).await.unwrap();
        registry.advance(&id, ScanStatus::Verification, 40).await.unwrap();

        let job = registry.get(&id).await.unwrap();
        assert_eq!(job.progress, 70);
        assert!(job.visited(ScanStatus::PassiveEnumeration));
        assert!(!job.visited(ScanStatus::ActiveEnumeration));
    }

    #[tokio::test]
    async fn terminal_jobs_are_never_resurrected() {
        let registry = JobRegistry::new();
        let id = registry.create("example.com").await;
        registry.complete(&id, Vec::new()).await.unwrap();

        let err = registry.advance(&id, ScanStatus::Verification, 70).await.unwrap_err();
        assert!(matches!(err, ReconError::JobFinalized { .. }));
        assert!(registry.fail(&id, "late").await.is_err());

        let job = registry.get(&id).await.unwrap();
        assert_eq!(job.status, ScanStatus::Completed);
        assert_eq!(job.progress, 100);
        assert_eq!(job.error, None);
    }

    #[tokio::test]
    async fn unknown_ids_are_reported() {
        let registry = JobRegistry::new();
        assert!(registry.get("nope").await.is_none());
        let err = registry.fail("nope", "boom").await.unwrap_err();
        assert!(matches!(err, ReconError::UnknownJob(_)));
    }
}
