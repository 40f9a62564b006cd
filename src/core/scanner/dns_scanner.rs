// src/core/scanner/dns_scanner.rs

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use tracing::{debug, trace};

use super::Resolver;

/// Asynchronous DNS resolver backed by hickory.
///
/// Each lookup is a single attempt bounded by `timeout`. Brute-force candidate
/// sets are large and low-yield, so a miss is never retried.
pub struct DnsResolver {
    resolver: TokioAsyncResolver,
    timeout: Duration,
}

impl DnsResolver {
    pub fn new(timeout: Duration) -> Self {
        let mut opts = ResolverOpts::default();
        opts.timeout = timeout;
        opts.attempts = 1;

        debug!(timeout_secs = timeout.as_secs_f32(), "Initializing DNS resolver.");
        let resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), opts);

        Self { resolver, timeout }
    }
}

#[async_trait]
impl Resolver for DnsResolver {
    async fn resolve(&self, name: &str) -> Option<IpAddr> {
        // The outer timeout also covers time spent queued inside the resolver.
        match tokio::time::timeout(self.timeout, self.resolver.lookup_ip(name)).await {
            Ok(Ok(lookup)) => {
                let ip = lookup.iter().next();
                trace!(target = name, ip = ?ip, "Name resolved.");
                ip
            }
            Ok(Err(e)) => {
                trace!(target = name, error = %e, "Name did not resolve.");
                None
            }
            Err(_) => {
                trace!(target = name, "DNS lookup timed out.");
                None
            }
        }
    }
}
