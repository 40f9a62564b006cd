// src/core/scanner/mod.rs

// The active half of the recon pipeline: name resolution, liveness probing,
// the bounded fan-out that drives both, and the two stages built on top of it.
pub mod brute_force;
pub mod dns_scanner;
pub mod fan_out;
pub mod http_scanner;
pub mod verify;

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::models::{HttpProbe, Scheme};

pub use self::dns_scanner::DnsResolver;
pub use self::fan_out::fan_out;
pub use self::http_scanner::HttpProber;

/// Resolves one candidate name to at most one address.
///
/// Implementations enforce their own timeout and report every failure
/// (timeout, NXDOMAIN, resolver error) as `None`.
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, name: &str) -> Option<IpAddr>;
}

/// Issues a single HTTP or HTTPS probe against a host.
///
/// Network errors, timeouts and TLS failures are reported as `None`.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, name: &str, scheme: Scheme) -> Option<HttpProbe>;
}

/// The resolver and prober pair driven by the fan-out, with its concurrency ceiling.
#[derive(Clone)]
pub struct ActiveScanner {
    resolver: Arc<dyn Resolver>,
    prober: Arc<dyn Prober>,
    ceiling: usize,
}

impl ActiveScanner {
    pub fn new(
        resolver: Arc<dyn Resolver>,
        prober: Arc<dyn Prober>,
        ceiling: usize,
    ) -> Self {
        Self { resolver, prober, ceiling: ceiling.max(1) }
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }
}
