//! cardcheck-intake library interface
//!
//! Exposes the router and state so integration tests can drive the service
//! in-process.

pub mod api;
pub mod config;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::services::OcrEngine;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Resolved service configuration
    pub config: Arc<Config>,
    /// OCR engine handle, created once at startup
    pub ocr: Arc<dyn OcrEngine>,
    /// Service startup timestamp for uptime reporting
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: Config, ocr: Arc<dyn OcrEngine>) -> Self {
        Self {
            config: Arc::new(config),
            ocr,
            started_at: Utc::now(),
        }
    }
}

/// Build application router
///
/// Submission routes carry the upload-size ceiling; anything not claimed by
/// a route falls through to static asset lookup.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::submit_routes().layer(DefaultBodyLimit::max(state.config.max_upload_bytes)))
        .merge(api::health_routes())
        .fallback(api::serve_asset)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
