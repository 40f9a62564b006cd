// src/core/models.rs

use std::fmt;
use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// --- Probe Models ---

/// The two schemes the liveness prober knows how to speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn url_for(self, host: &str) -> String {
        format!("{}://{}", self, host)
    }
}

/// What a single successful HTTP or HTTPS probe observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpProbe {
    pub status: u16,
    pub server: String,
    pub cdn_detected: bool,
}

/// Tri-state CDN signal. `Unknown` means no probe got an answer to look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, Default)]
pub enum CdnStatus {
    Enabled,
    Disabled,
    #[default]
    Unknown,
}

impl From<bool> for CdnStatus {
    fn from(detected: bool) -> Self {
        if detected { CdnStatus::Enabled } else { CdnStatus::Disabled }
    }
}

/// The detail record attached to every subdomain that survives the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub name: String,
    pub ip: Option<IpAddr>,
    pub http_status: Option<u16>,
    pub https_status: Option<u16>,
    pub server: String,
    pub cdn_detected: CdnStatus,
    pub observed_at: DateTime<Utc>,
}

impl ProbeResult {
    /// Builds a result from the raw observations of one candidate.
    ///
    /// The HTTPS answer wins for the server and CDN signal; the HTTP answer is
    /// only consulted when HTTPS produced nothing.
    pub fn from_observations(
        name: String,
        ip: Option<IpAddr>,
        http: Option<&HttpProbe>,
        https: Option<&HttpProbe>,
    ) -> Self {
        let preferred = preferred_probe(http, https);
        Self {
            name,
            ip,
            http_status: http.map(|p| p.status),
            https_status: https.map(|p| p.status),
            server: preferred.map(|p| p.server.clone()).unwrap_or_default(),
            cdn_detected: preferred
                .map(|p| CdnStatus::from(p.cdn_detected))
                .unwrap_or_default(),
            observed_at: Utc::now(),
        }
    }

    /// A record for a name whose detail task never produced observations.
    pub fn unobserved(name: String) -> Self {
        Self::from_observations(name, None, None, None)
    }
}

/// Single preference rule shared by verification and brute-force confirmation.
pub fn preferred_probe<'a>(
    http: Option<&'a HttpProbe>,
    https: Option<&'a HttpProbe>,
) -> Option<&'a HttpProbe> {
    https.or(http)
}

// --- Job Models ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScanStatus {
    Queued,
    PassiveEnumeration,
    ActiveEnumeration,
    Verification,
    Completed,
    Failed,
}

impl ScanStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ScanStatus::Completed | ScanStatus::Failed)
    }
}

/// One visited phase in a job's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseMark {
    pub status: ScanStatus,
    pub progress: u8,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanJob {
    pub id: String,
    pub domain: String,
    pub status: ScanStatus,
    pub progress: u8,
    pub results: Vec<ProbeResult>,
    pub count: usize,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub timeline: Vec<PhaseMark>,
}

impl ScanJob {
    pub fn new(id: String, domain: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            domain,
            status: ScanStatus::Queued,
            progress: 0,
            results: Vec::new(),
            count: 0,
            error: None,
            created_at: now,
            updated_at: now,
            timeline: vec![PhaseMark { status: ScanStatus::Queued, progress: 0, at: now }],
        }
    }

    pub fn visited(&self, status: ScanStatus) -> bool {
        self.timeline.iter().any(|mark| mark.status == status)
    }
}

impl fmt::Display for ScanJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{} {}%]", self.id, self.status, self.progress)
    }
}
