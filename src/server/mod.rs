//! HTTP server setup and routing.

mod pages;
mod predict;
mod routes;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;

use crate::inference::Models;

/// Largest accepted request body (uploaded images)
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Shared application state passed to all handlers.
///
/// Everything in here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub models: Arc<Models>,
    /// Server start time for uptime calculation
    pub started_at: Instant,
}

impl AppState {
    pub fn new(models: Models) -> Self {
        Self {
            models: Arc::new(models),
            started_at: Instant::now(),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// Creates the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // HTML pages
        .route("/", get(routes::home))
        .route("/text-emotion", get(routes::text_emotion_page))
        .route("/face-emotion", get(routes::face_emotion_page))
        .route("/history", get(routes::history_page))
        // Prediction endpoints
        .route("/predict-text-emotion", post(predict::predict_text_emotion))
        .route("/predict-face", post(predict::predict_face))
        .route("/health", get(routes::health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
