//! Page and health route handlers.

use axum::{extract::State, response::Html, Json};

use crate::error::Result;
use crate::types::{HealthResponse, HealthStatus, ModelSummary};

use super::pages::{self, FaceEmotionPage, HistoryPage, IndexPage, TextEmotionPage};
use super::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// GET /
pub async fn home() -> Result<Html<String>> {
    pages::html(&IndexPage)
}

/// GET /text-emotion
pub async fn text_emotion_page() -> Result<Html<String>> {
    pages::html(&TextEmotionPage {
        user_input: "",
        prediction: None,
    })
}

/// GET /face-emotion
pub async fn face_emotion_page() -> Result<Html<String>> {
    pages::html(&FaceEmotionPage)
}

/// GET /history
///
/// History lives in the browser; the page only renders it.
pub async fn history_page() -> Result<Html<String>> {
    pages::html(&HistoryPage)
}

/// Health check endpoint
///
/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let models = &state.models;

    Json(HealthResponse {
        status: HealthStatus::Healthy,
        version: VERSION.to_string(),
        uptime_seconds: state.uptime_seconds(),
        models: ModelSummary {
            text_classes: models.text_classes().to_vec(),
            face_classes: models.face_classes().to_vec(),
            face_probabilities: models.face_has_probability(),
        },
    })
}
