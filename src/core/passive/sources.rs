// src/core/passive/sources.rs

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::PassiveSource;
use crate::config::Config;
use crate::core::error::SourceError;

const SUBFINDER_TIMEOUT: Duration = Duration::from_secs(120);
const CRTSH_TIMEOUT: Duration = Duration::from_secs(15);
const SHODAN_TIMEOUT: Duration = Duration::from_secs(15);
const SCRAPE_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the passive sources enabled by `config`.
///
/// The Shodan source is only included when an API key is configured.
pub fn default_sources(config: &Config) -> Result<Vec<Arc<dyn PassiveSource>>, reqwest::Error> {
    if !config.enable_passive {
        info!("Passive enumeration disabled by configuration.");
        return Ok(Vec::new());
    }

    let client = Client::builder().user_agent(config.user_agent.as_str()).build()?;

    let mut sources: Vec<Arc<dyn PassiveSource>> = vec![
        Arc::new(Subfinder::new(&config.subfinder_bin)),
        Arc::new(CrtSh::new(client.clone())),
        Arc::new(ScrapeSource::new(
            "hackertarget",
            "https://api.hackertarget.com/hostsearch/?q={domain}",
            client.clone(),
        )),
        Arc::new(ScrapeSource::new(
            "alienvault",
            "https://otx.alienvault.com/api/v1/indicators/domain/{domain}/passive_dns",
            client.clone(),
        )),
    ];

    match &config.shodan_api_key {
        Some(key) => sources.push(Arc::new(Shodan::new(client, key))),
        None => debug!("No Shodan API key configured, skipping Shodan source."),
    }

    Ok(sources)
}

fn ensure_success(response: &reqwest::Response) -> Result<(), SourceError> {
    let status = response.status();
    if status.is_success() { Ok(()) } else { Err(SourceError::Status(status)) }
}

// --- subfinder ---

/// Runs the external `subfinder` binary and reads one name per stdout line.
pub struct Subfinder {
    binary: String,
}

impl Subfinder {
    pub fn new(binary: &str) -> Self {
        Self { binary: binary.to_string() }
    }
}

#[async_trait]
impl PassiveSource for Subfinder {
    fn name(&self) -> &'static str {
        "subfinder"
    }

    async fn fetch(&self, domain: &str) -> Result<Vec<String>, SourceError> {
        let child = Command::new(&self.binary)
            .args(["-d", domain, "-silent", "-timeout", "5"])
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SourceError::Spawn { binary: self.binary.clone(), source })?;

        let output = tokio::time::timeout(SUBFINDER_TIMEOUT, child.wait_with_output())
            .await
            .map_err(|_| SourceError::Timeout(SUBFINDER_TIMEOUT.as_secs()))?
            .map_err(|source| SourceError::Spawn { binary: self.binary.clone(), source })?;

        if !output.status.success() {
            return Err(SourceError::Exit(self.binary.clone(), output.status));
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }
}

// --- crt.sh ---

#[derive(Debug, Deserialize)]
struct CrtShEntry {
    name_value: String,
}

/// Certificate-transparency search on crt.sh.
pub struct CrtSh {
    client: Client,
}

impl CrtSh {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

/// Splits crt.sh `name_value` fields, which pack one SAN per line.
fn parse_crtsh(body: &str) -> Result<Vec<String>, SourceError> {
    let entries: Vec<CrtShEntry> = serde_json::from_str(body)?;
    Ok(entries
        .iter()
        .flat_map(|entry| entry.name_value.lines())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect())
}

#[async_trait]
impl PassiveSource for CrtSh {
    fn name(&self) -> &'static str {
        "crt.sh"
    }

    async fn fetch(&self, domain: &str) -> Result<Vec<String>, SourceError> {
        let query = format!("%.{domain}");
        let response = self
            .client
            .get("https://crt.sh/")
            .query(&[("q", query.as_str()), ("output", "json")])
            .timeout(CRTSH_TIMEOUT)
            .send()
            .await?;
        ensure_success(&response)?;
        parse_crtsh(&response.text().await?)
    }
}

// --- Shodan ---

#[derive(Debug, Default, Deserialize)]
struct ShodanSearch {
    #[serde(default)]
    matches: Vec<ShodanMatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ShodanMatch {
    #[serde(default)]
    hostnames: Vec<String>,
}

/// Shodan host search over the `hostname:` and `ssl:` filters.
pub struct Shodan {
    client: Client,
    api_key: String,
}

impl Shodan {
    pub fn new(client: Client, api_key: &str) -> Self {
        Self { client, api_key: api_key.to_string() }
    }

    async fn search(&self, query: &str) -> Result<Vec<String>, SourceError> {
        let response = self
            .client
            .get("https://api.shodan.io/shodan/host/search")
            .query(&[("key", self.api_key.as_str()), ("query", query)])
            .timeout(SHODAN_TIMEOUT)
            .send()
            .await?;
        ensure_success(&response)?;
        let search: ShodanSearch = serde_json::from_str(&response.text().await?)?;
        Ok(search.matches.into_iter().flat_map(|m| m.hostnames).collect())
    }
}

#[async_trait]
impl PassiveSource for Shodan {
    fn name(&self) -> &'static str {
        "shodan"
    }

    /// Each query stands on its own; the source only fails when every query did.
    async fn fetch(&self, domain: &str) -> Result<Vec<String>, SourceError> {
        let mut found = Vec::new();
        let mut last_error = None;
        for query in [format!("hostname:{domain}"), format!("ssl:{domain}")] {
            match self.search(&query).await {
                Ok(names) => found.extend(names),
                Err(e) => {
                    warn!(query = %query, error = %e, "Shodan query failed.");
                    last_error = Some(e);
                }
            }
        }
        match last_error {
            Some(e) if found.is_empty() => Err(e),
            _ => Ok(found),
        }
    }
}

// --- generic passive DNS scraping ---

/// A passive-DNS endpoint whose body is scraped for host names under the domain.
///
/// `url_template` carries a `{domain}` placeholder.
pub struct ScrapeSource {
    name: &'static str,
    url_template: &'static str,
    client: Client,
}

impl ScrapeSource {
    pub fn new(name: &'static str, url_template: &'static str, client: Client) -> Self {
        Self { name, url_template, client }
    }
}

/// Extracts every `something.domain` token from a free-form body.
///
/// The token has to end where the domain ends: `api.example.community` is not
/// a host of `example.com`. A single trailing dot is tolerated.
fn scrape_hosts(body: &str, domain: &str) -> Result<Vec<String>, SourceError> {
    let pattern = format!(
        r"([a-zA-Z0-9][a-zA-Z0-9.-]*\.{})\.?(?:[^a-zA-Z0-9.-]|$)",
        regex::escape(domain)
    );
    let re = Regex::new(&pattern)?;
    Ok(re
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect())
}

#[async_trait]
impl PassiveSource for ScrapeSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(&self, domain: &str) -> Result<Vec<String>, SourceError> {
        let url = self.url_template.replace("{domain}", domain);
        let response = self.client.get(&url).timeout(SCRAPE_TIMEOUT).send().await?;
        ensure_success(&response)?;
        scrape_hosts(&response.text().await?, domain)
    }
}
