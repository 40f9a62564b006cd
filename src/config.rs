// src/config.rs

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr, bail};

use crate::logging::get_data_dir;

/// Runtime settings for the server and the recon pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    // Server settings
    pub host: String,
    pub port: u16,

    // Performance settings
    pub max_concurrency: usize,
    pub dns_timeout: Duration,
    pub http_timeout: Duration,

    // Pipeline settings
    pub bruteforce_floor: usize,
    pub bruteforce_require_http: bool,
    pub enable_passive: bool,
    pub enable_bruteforce: bool,
    pub wordlist_path: PathBuf,

    // Probe settings
    pub cdn_header: String,
    pub user_agent: String,

    // Passive source settings
    pub subfinder_bin: String,
    pub shodan_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5051,
            max_concurrency: 50,
            dns_timeout: Duration::from_secs(3),
            http_timeout: Duration::from_secs(5),
            bruteforce_floor: 50,
            bruteforce_require_http: false,
            enable_passive: true,
            enable_bruteforce: true,
            wordlist_path: get_data_dir().join("wordlists").join("subdomains.txt"),
            cdn_header: "cf-ray".to_string(),
            user_agent: format!("VanguardRecon/{}", env!("CARGO_PKG_VERSION")),
            subfinder_bin: "subfinder".to_string(),
            shodan_api_key: None,
        }
    }
}

impl Config {
    /// Reads the configuration from the environment, seeding it from `.env` if present.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let defaults = Self::default();
        let config = Self {
            host: env::var("RECON_HOST").unwrap_or(defaults.host),
            port: parse_var("RECON_PORT", defaults.port)?,
            max_concurrency: parse_var("RECON_MAX_CONCURRENCY", defaults.max_concurrency)?,
            dns_timeout: Duration::from_secs(parse_var("RECON_DNS_TIMEOUT_SECS", 3)?),
            http_timeout: Duration::from_secs(parse_var("RECON_HTTP_TIMEOUT_SECS", 5)?),
            bruteforce_floor: parse_var("RECON_BRUTEFORCE_FLOOR", defaults.bruteforce_floor)?,
            bruteforce_require_http: parse_var(
                "RECON_BRUTEFORCE_REQUIRE_HTTP",
                defaults.bruteforce_require_http,
            )?,
            enable_passive: parse_var("RECON_ENABLE_PASSIVE", defaults.enable_passive)?,
            enable_bruteforce: parse_var("RECON_ENABLE_BRUTEFORCE", defaults.enable_bruteforce)?,
            wordlist_path: env::var("RECON_WORDLIST")
                .map(PathBuf::from)
                .unwrap_or(defaults.wordlist_path),
            cdn_header: env::var("RECON_CDN_HEADER")
                .map(|h| h.to_ascii_lowercase())
                .unwrap_or(defaults.cdn_header),
            user_agent: env::var("RECON_USER_AGENT").unwrap_or(defaults.user_agent),
            subfinder_bin: env::var("RECON_SUBFINDER_BIN").unwrap_or(defaults.subfinder_bin),
            shodan_api_key: env::var("SHODAN_API_KEY").ok().filter(|k| !k.trim().is_empty()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_concurrency == 0 {
            bail!("RECON_MAX_CONCURRENCY must be at least 1");
        }
        if self.dns_timeout.is_zero() || self.http_timeout.is_zero() {
            bail!("DNS and HTTP timeouts must be non-zero");
        }
        if self.cdn_header.trim().is_empty() {
            bail!("RECON_CDN_HEADER must not be empty");
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .wrap_err_with(|| format!("invalid value for {key}: {raw:?}")),
        Err(_) => Ok(default),
    }
}
