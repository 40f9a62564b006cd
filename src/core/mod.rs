// src/core/mod.rs

/// Data structures shared across the crate: probe results, scan jobs and their
/// status machine.
pub mod models;

/// Error types for registry, pipeline and passive-source faults.
pub mod error;

/// Normalization of user-supplied target domains.
pub mod domain;

/// Name resolution, liveness probing and the bounded fan-out that drives them.
pub mod scanner;

/// Passive enumeration sources and the aggregator merging their output.
pub mod passive;

/// Brute-force prefix lists.
pub mod wordlist;

/// In-memory store of scan jobs.
pub mod registry;

/// The multi-phase recon orchestrator.
pub mod pipeline;

/// JSON and plain-text renderings of finished scans.
pub mod export;

#[cfg(test)]
pub(crate) mod testing;
