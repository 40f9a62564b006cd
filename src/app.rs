// src/app.rs

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::handlers::{enumerate_handler, export_handler, health_handler, scan_handler};
use crate::config::Config;
use crate::core::pipeline::Pipeline;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(pipeline: Pipeline, config: Config) -> Self {
        Self { pipeline, config: Arc::new(config) }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/enumerate", post(enumerate_handler))
        .route("/api/scan/{scan_id}", get(scan_handler))
        .route("/api/export/{scan_id}/{format}", get(export_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
