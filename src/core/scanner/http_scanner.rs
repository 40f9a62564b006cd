// src/core/scanner/http_scanner.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, SERVER};
use reqwest::redirect::Policy;
use tracing::{debug, trace, warn};

use super::Prober;
use crate::core::models::{HttpProbe, Scheme};

const MAX_REDIRECTS: usize = 10;

/// Reads a header as text, tolerating values that are not valid UTF-8.
///
/// # Returns
/// `None` when the header is absent, the (lossy) value otherwise.
fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    let value = headers.get(name)?;
    match value.to_str() {
        Ok(s) => Some(s.to_string()),
        Err(_) => {
            warn!(header_name = name, "Header contained invalid UTF-8.");
            Some(String::from_utf8_lossy(value.as_bytes()).into_owned())
        }
    }
}

/// Extracts the fingerprint of one response: status, `Server` header and whether
/// the CDN marker header is present.
pub fn fingerprint(status: u16, headers: &HeaderMap, cdn_header: &str) -> HttpProbe {
    HttpProbe {
        status,
        server: header_text(headers, SERVER.as_str()).unwrap_or_default(),
        cdn_detected: headers.contains_key(cdn_header),
    }
}

/// Liveness prober built on a shared `reqwest` client.
///
/// Certificate validation is disabled: the probe measures reachability and
/// fingerprints the responder, it does not establish trust. Redirects are followed.
pub struct HttpProber {
    client: reqwest::Client,
    cdn_header: String,
}

impl HttpProber {
    pub fn new(
        timeout: Duration,
        user_agent: &str,
        cdn_header: &str,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()?;

        debug!(timeout_secs = timeout.as_secs_f32(), cdn_header, "HTTP prober ready.");
        Ok(Self { client, cdn_header: cdn_header.to_ascii_lowercase() })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, name: &str, scheme: Scheme) -> Option<HttpProbe> {
        let url = scheme.url_for(name);
        match self.client.get(&url).send().await {
            Ok(response) => {
                let probe = fingerprint(
                    response.status().as_u16(),
                    response.headers(),
                    &self.cdn_header,
                );
                trace!(url = %url, status = probe.status, cdn = probe.cdn_detected, "Probe answered.");
                Some(probe)
            }
            Err(e) => {
                trace!(url = %url, error = %e, "Probe failed.");
                None
            }
        }
    }
}
