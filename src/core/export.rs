// src/core/export.rs

use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::{Display, EnumString};

use crate::core::models::{ProbeResult, ScanJob};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Txt,
}

#[derive(Debug, Serialize)]
pub struct JsonExport<'a> {
    pub domain: &'a str,
    pub subdomains: &'a [ProbeResult],
    pub count: usize,
    pub generated_at: String,
}

pub fn to_json(job: &ScanJob, generated_at: DateTime<Utc>) -> JsonExport<'_> {
    JsonExport {
        domain: &job.domain,
        subdomains: &job.results,
        count: job.results.len(),
        generated_at: generated_at.format(TIMESTAMP_FORMAT).to_string(),
    }
}

/// Renders the plain-text report: a commented header, then one block per name
/// listing only the fields that carry a value.
pub fn to_text(job: &ScanJob, generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Subdomain Enumeration Results");
    let _ = writeln!(out, "# Domain: {}", job.domain);
    let _ = writeln!(out, "# Generated at: {}", generated_at.format(TIMESTAMP_FORMAT));
    let _ = writeln!(out, "# Total subdomains: {}", job.results.len());
    out.push('\n');

    for result in &job.results {
        let _ = writeln!(out, "{}", result.name);
        if let Some(ip) = result.ip {
            let _ = writeln!(out, "  IP: {ip}");
        }
        if let Some(status) = result.http_status {
            let _ = writeln!(out, "  HTTP: {status}");
        }
        if let Some(status) = result.https_status {
            let _ = writeln!(out, "  HTTPS: {status}");
        }
        if !result.server.is_empty() {
            let _ = writeln!(out, "  Server: {}", result.server);
        }
        let _ = writeln!(out, "  CDN: {}", result.cdn_detected);
        out.push('\n');
    }
    out
}

pub fn text_filename(job: &ScanJob) -> String {
    format!("subdomains_{}.txt", job.domain)
}
