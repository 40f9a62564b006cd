// src/logging.rs

use std::fs::OpenOptions;
use std::path::PathBuf;

use color_eyre::eyre::{Result, WrapErr};
use directories::ProjectDirs;
use lazy_static::lazy_static;
use tracing_error::ErrorLayer;
use tracing_subscriber::{self, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

lazy_static! {
    pub static ref LOG_ENV: String = format!("{}_LOGLEVEL", env!("CARGO_CRATE_NAME").to_uppercase());
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
    static ref DEFAULT_FILTER: String =
        format!("{}=info,tower_http=info", env!("CARGO_CRATE_NAME"));
}

/// Overrides where the scan log is written.
const LOG_DIR_ENV: &str = "RECON_LOG_DIR";

/// Local data directory of the service: wordlists and logs live under it.
pub fn get_data_dir() -> PathBuf {
    ProjectDirs::from("io", "vanguard-recon", env!("CARGO_PKG_NAME"))
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".").join(".data"))
}

fn log_dir() -> PathBuf {
    std::env::var_os(LOG_DIR_ENV)
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| get_data_dir().join("logs"))
}

fn log_level() -> String {
    std::env::var("RUST_LOG")
        .or_else(|_| std::env::var(LOG_ENV.as_str()))
        .unwrap_or_else(|_| DEFAULT_FILTER.clone())
}

/// Logs to stdout and appends to `<log dir>/vanguard-recon.log`.
///
/// The file survives restarts so the history of earlier scans stays readable.
pub fn initialize_logging() -> Result<()> {
    let directory = log_dir();
    std::fs::create_dir_all(&directory)
        .wrap_err_with(|| format!("cannot create log directory {}", directory.display()))?;
    let log_path = directory.join(LOG_FILE.as_str());
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .wrap_err_with(|| format!("cannot open log file {}", log_path.display()))?;

    let file_subscriber = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_filter(EnvFilter::new(log_level()));

    let stdout_subscriber = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_filter(EnvFilter::new(log_level()));

    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(stdout_subscriber)
        .with(ErrorLayer::default())
        .init();

    tracing::info!(path = %log_path.display(), "Logging initialized.");
    Ok(())
}
