// src/core/testing.rs

// In-memory doubles for the network-facing traits.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::core::error::SourceError;
use crate::core::models::{HttpProbe, Scheme};
use crate::core::passive::PassiveSource;
use crate::core::scanner::{Prober, Resolver};

#[derive(Default)]
pub struct StaticResolver {
    answers: HashMap<String, IpAddr>,
}

impl StaticResolver {
    pub fn with(mut self, name: &str, ip: &str) -> Self {
        self.answers.insert(name.to_string(), ip.parse().unwrap());
        self
    }
}

#[async_trait]
impl Resolver for StaticResolver {
    async fn resolve(&self, name: &str) -> Option<IpAddr> {
        self.answers.get(name).copied()
    }
}

#[derive(Default)]
pub struct StaticProber {
    answers: HashMap<(String, Scheme), HttpProbe>,
}

impl StaticProber {
    pub fn with(mut self, name: &str, scheme: Scheme, probe: HttpProbe) -> Self {
        self.answers.insert((name.to_string(), scheme), probe);
        self
    }
}

#[async_trait]
impl Prober for StaticProber {
    async fn probe(&self, name: &str, scheme: Scheme) -> Option<HttpProbe> {
        self.answers.get(&(name.to_string(), scheme)).cloned()
    }
}

/// Resolver and prober that answers everything after a short pause while
/// recording how many calls overlapped.
#[derive(Default)]
pub struct Gauge {
    pub calls: AtomicUsize,
    pub peak: AtomicUsize,
    in_flight: AtomicUsize,
}

impl Gauge {
    async fn hold(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(15)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Resolver for Gauge {
    async fn resolve(&self, _name: &str) -> Option<IpAddr> {
        self.hold().await;
        Some(IpAddr::V4(Ipv4Addr::LOCALHOST))
    }
}

#[async_trait]
impl Prober for Gauge {
    async fn probe(&self, _name: &str, _scheme: Scheme) -> Option<HttpProbe> {
        self.hold().await;
        Some(HttpProbe { status: 200, server: String::new(), cdn_detected: false })
    }
}

pub struct StaticSource {
    name: &'static str,
    names: Vec<String>,
}

impl StaticSource {
    pub fn new(name: &'static str, names: &[&str]) -> Self {
        Self { name, names: names.iter().map(|s| s.to_string()).collect() }
    }

    pub fn numbered(count: usize, domain: &str) -> Self {
        Self {
            name: "numbered",
            names: (0..count).map(|i| format!("host{i}.{domain}")).collect(),
        }
    }
}

#[async_trait]
impl PassiveSource for StaticSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(&self, _domain: &str) -> Result<Vec<String>, SourceError> {
        Ok(self.names.clone())
    }
}

pub struct FailingSource;

#[async_trait]
impl PassiveSource for FailingSource {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn fetch(&self, _domain: &str) -> Result<Vec<String>, SourceError> {
        Err(SourceError::Timeout(1))
    }
}

/// A source with a bug in it, for exercising the pipeline's last-resort handling.
pub struct PanickingSource;

#[async_trait]
impl PassiveSource for PanickingSource {
    fn name(&self) -> &'static str {
        "panicking"
    }

    async fn fetch(&self, _domain: &str) -> Result<Vec<String>, SourceError> {
        panic!("source parser bug")
    }
}
