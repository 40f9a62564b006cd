// src/core/error.rs

use thiserror::Error;

use crate::core::models::ScanStatus;

#[derive(Debug, Error)]
pub enum ReconError {
    #[error("scan `{0}` not found")]
    UnknownJob(String),

    #[error("scan `{id}` is already {status} and cannot change")]
    JobFinalized { id: String, status: ScanStatus },

    #[error("invalid domain: {0}")]
    InvalidDomain(String),

    #[error("verification returned {got} results for {expected} candidates")]
    IncompleteVerification { expected: usize, got: usize },
}

/// Why a single passive source contributed nothing.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("failed to run `{binary}`: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{0}` exited with {1}")]
    Exit(String, std::process::ExitStatus),

    #[error("invalid scrape pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("timed out after {0}s")]
    Timeout(u64),
}
