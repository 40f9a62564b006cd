// src/api/mod.rs

// The HTTP surface: job submission, polling and export.
pub mod error;
pub mod handlers;

pub use self::error::{ApiError, ApiResult};
