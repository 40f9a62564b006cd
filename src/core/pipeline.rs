// src/core/pipeline.rs

use std::path::PathBuf;
use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr};
use tracing::{error, info, instrument};

use crate::config::Config;
use crate::core::error::ReconError;
use crate::core::models::{ProbeResult, ScanStatus};
use crate::core::passive::{PassiveAggregator, default_sources};
use crate::core::registry::JobRegistry;
use crate::core::scanner::{ActiveScanner, DnsResolver, HttpProber};
use crate::core::wordlist;

const PASSIVE_PROGRESS: u8 = 10;
const ACTIVE_PROGRESS: u8 = 40;
const VERIFICATION_PROGRESS: u8 = 70;

/// The knobs of the orchestrator that are not owned by a sub-stage.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub bruteforce_floor: usize,
    pub bruteforce_require_http: bool,
    pub enable_bruteforce: bool,
    pub wordlist_path: PathBuf,
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            bruteforce_floor: config.bruteforce_floor,
            bruteforce_require_http: config.bruteforce_require_http,
            enable_bruteforce: config.enable_bruteforce,
            wordlist_path: config.wordlist_path.clone(),
        }
    }
}

/// Sequences passive enumeration, optional brute force and verification for
/// each submitted job, publishing progress through the registry.
#[derive(Clone)]
pub struct Pipeline {
    registry: JobRegistry,
    passive: PassiveAggregator,
    scanner: ActiveScanner,
    settings: Arc<PipelineSettings>,
}

impl Pipeline {
    pub fn new(
        registry: JobRegistry,
        passive: PassiveAggregator,
        scanner: ActiveScanner,
        settings: PipelineSettings,
    ) -> Self {
        Self { registry, passive, scanner, settings: Arc::new(settings) }
    }

    /// Wires the production resolver, prober and passive sources from `config`.
    pub fn from_config(config: &Config, registry: JobRegistry) -> Result<Self> {
        let resolver = Arc::new(DnsResolver::new(config.dns_timeout));
        let prober = Arc::new(
            HttpProber::new(config.http_timeout, &config.user_agent, &config.cdn_header)
                .wrap_err("failed to build the HTTP prober")?,
        );
        let sources = default_sources(config).wrap_err("failed to build passive sources")?;
        let passive = PassiveAggregator::new(sources);
        info!(sources = ?passive.source_names(), concurrency = config.max_concurrency, "Pipeline configured.");

        Ok(Self::new(
            registry,
            passive,
            ActiveScanner::new(resolver, prober, config.max_concurrency),
            PipelineSettings::from(config),
        ))
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    /// Registers a job for `domain` and starts it in the background.
    ///
    /// Returns as soon as the job exists; progress is observable via the registry.
    pub async fn submit(&self, domain: &str) -> String {
        let id = self.registry.create(domain).await;
        let pipeline = self.clone();
        let (job_id, domain) = (id.clone(), domain.to_string());
        tokio::spawn(async move { pipeline.run(job_id, domain).await });
        id
    }

    /// Runs one job to a terminal state.
    ///
    /// The body runs in its own task so that a panic anywhere below still ends
    /// with the job marked `Failed` instead of stuck mid-phase.
    pub async fn run(&self, id: String, domain: String) {
        let pipeline = self.clone();
        let (task_id, task_domain) = (id.clone(), domain.clone());
        let outcome = tokio::spawn(async move { pipeline.execute(&task_id, &task_domain).await }).await;

        let finished = match outcome {
            Ok(Ok(results)) => {
                info!(scan_id = %id, domain = %domain, found = results.len(), "Scan completed.");
                self.registry.complete(&id, results).await
            }
            Ok(Err(e)) => {
                error!(scan_id = %id, domain = %domain, error = ?e, "Scan failed.");
                self.registry.fail(&id, format!("{e:#}")).await
            }
            Err(e) => {
                error!(scan_id = %id, domain = %domain, error = %e, "Scan task aborted.");
                self.registry.fail(&id, format!("scan task aborted: {e}")).await
            }
        };

        if let Err(e) = finished {
            error!(scan_id = %id, error = %e, "Could not record the scan outcome.");
        }
    }

    fn should_brute_force(&self, passive_yield: usize) -> bool {
        self.settings.enable_bruteforce && passive_yield < self.settings.bruteforce_floor
    }

    #[instrument(skip(self))]
    async fn execute(&self, id: &str, domain: &str) -> Result<Vec<ProbeResult>> {
        self.registry.advance(id, ScanStatus::PassiveEnumeration, PASSIVE_PROGRESS).await?;
        let mut candidates = self.passive.aggregate(domain).await;

        if self.should_brute_force(candidates.len()) {
            info!(
                passive = candidates.len(),
                floor = self.settings.bruteforce_floor,
                "Passive yield below floor, brute forcing."
            );
            self.registry.advance(id, ScanStatus::ActiveEnumeration, ACTIVE_PROGRESS).await?;
            let prefixes = wordlist::load(&self.settings.wordlist_path).await;
            let confirmed = self
                .scanner
                .brute_force(domain, &prefixes, self.settings.bruteforce_require_http)
                .await;
            candidates.extend(confirmed);
        } else {
            info!(passive = candidates.len(), "Skipping brute force.");
        }

        self.registry.advance(id, ScanStatus::Verification, VERIFICATION_PROGRESS).await?;
        let names: Vec<String> = candidates.into_iter().collect();
        let results = self.scanner.verify(domain, &names).await;

        if results.len() != names.len() {
            return Err(ReconError::IncompleteVerification {
                expected: names.len(),
                got: results.len(),
            }
            .into());
        }
        Ok(results)
    }
}
