// src/api/handlers.rs

use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use super::error::{ApiError, ApiResult};
use crate::app::AppState;
use crate::core::domain::normalize_domain;
use crate::core::error::ReconError;
use crate::core::export::{self, ExportFormat};
use crate::core::models::{ScanJob, ScanStatus};

#[derive(Debug, Deserialize)]
pub struct EnumerateRequest {
    #[serde(default)]
    pub domain: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EnumerateResponse {
    pub scan_id: String,
    pub status: String,
}

pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "max_concurrency": state.config.max_concurrency,
        "bruteforce_floor": state.config.bruteforce_floor,
    }))
}

pub async fn enumerate_handler(
    State(state): State<AppState>,
    payload: Result<Json<EnumerateRequest>, JsonRejection>,
) -> ApiResult<Json<EnumerateResponse>> {
    let Json(request) = payload?;
    let raw = request.domain.unwrap_or_default();
    if raw.trim().is_empty() {
        return Err(ApiError::bad_request("Domain is required"));
    }

    let domain = normalize_domain(&raw).inspect_err(|e| {
        warn!(input = %raw, error = %e, "Rejected scan request.");
    })?;

    let scan_id = state.pipeline.submit(&domain).await;
    info!(scan_id = %scan_id, domain = %domain, "Scan submitted.");

    Ok(Json(EnumerateResponse { scan_id, status: "processing".to_string() }))
}

async fn find_job(state: &AppState, scan_id: &str) -> ApiResult<ScanJob> {
    state
        .pipeline
        .registry()
        .get(scan_id)
        .await
        .ok_or_else(|| ReconError::UnknownJob(scan_id.to_string()).into())
}

pub async fn scan_handler(
    State(state): State<AppState>,
    Path(scan_id): Path<String>,
) -> ApiResult<Json<ScanJob>> {
    let job = find_job(&state, &scan_id).await?;
    debug!(job = %job, "Scan polled.");
    Ok(Json(job))
}

pub async fn export_handler(
    State(state): State<AppState>,
    Path((scan_id, format)): Path<(String, String)>,
) -> ApiResult<Response> {
    let job = find_job(&state, &scan_id).await?;
    if job.status != ScanStatus::Completed {
        return Err(ApiError::bad_request("Scan not completed yet"));
    }

    let format = ExportFormat::from_str(&format)
        .map_err(|_| ApiError::bad_request("Invalid format type"))?;
    info!(scan_id = %scan_id, %format, results = job.results.len(), "Exporting scan.");

    let now = Utc::now();
    let response = match format {
        ExportFormat::Json => Json(export::to_json(&job, now)).into_response(),
        ExportFormat::Txt => (
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename={}", export::text_filename(&job)),
                ),
            ],
            export::to_text(&job, now),
        )
            .into_response(),
    };
    Ok(response)
}
