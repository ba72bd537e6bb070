//! Prediction route handlers.

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::emotion::{describe_face, TextPrediction};
use crate::error::AppError;
use crate::inference::ModelError;
use crate::types::{FacePredictionResponse, PredictionErrorResponse, TextEmotionForm};

use super::pages::{self, TextEmotionPage};
use super::AppState;

/// Multipart field carrying the uploaded image
const FILE_FIELD: &str = "file";

/// POST /predict-text-emotion
///
/// Classify the submitted text and render the text emotion page with the result.
pub async fn predict_text_emotion(
    State(state): State<AppState>,
    Form(form): Form<TextEmotionForm>,
) -> Result<Html<String>, AppError> {
    let label = tokio::task::spawn_blocking({
        let models = state.models.clone();
        let text = form.user_input.clone();
        move || models.predict_text(&text)
    })
    .await
    .map_err(|e| {
        error!(error = %e, "Text prediction task panicked");
        AppError::Internal(e.to_string())
    })??;

    let prediction = TextPrediction::from_label(label);
    info!(
        emotion = %prediction.label,
        emoji = prediction.emoji,
        input_len = form.user_input.len(),
        "Text emotion predicted"
    );

    pages::html(&TextEmotionPage {
        user_input: &form.user_input,
        prediction: Some(&prediction),
    })
}

/// Failures on the face path; all of them surface as `{"error": ...}` with a 500.
#[derive(Debug, Error)]
enum FacePredictionError {
    #[error("Failed to read upload: {0}")]
    Upload(String),

    #[error("No 'file' field in upload")]
    MissingFile,

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Prediction task failed: {0}")]
    Task(String),
}

impl IntoResponse for FacePredictionError {
    fn into_response(self) -> Response {
        let body = PredictionErrorResponse {
            error: self.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// POST /predict-face
///
/// Classify the facial emotion in an uploaded image.
pub async fn predict_face(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    match classify_upload(&state, multipart).await {
        Ok(body) => Json(body).into_response(),
        Err(e) => {
            error!(error = %e, "Error in face prediction");
            e.into_response()
        }
    }
}

async fn classify_upload(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<FacePredictionResponse, FacePredictionError> {
    let mut multipart = multipart.map_err(|e| FacePredictionError::Upload(e.body_text()))?;
    let image = read_file_field(&mut multipart).await?;

    debug!(bytes = image.len(), "Received face image");

    let output = tokio::task::spawn_blocking({
        let models = state.models.clone();
        move || models.predict_face(&image)
    })
    .await
    .map_err(|e| FacePredictionError::Task(e.to_string()))??;

    let response = describe_face(&output);
    info!(
        index = output.class,
        emotion = %response.primary_emotion,
        confidence = ?response.confidence,
        emoji = %response.emoji,
        "Face emotion predicted"
    );

    Ok(response)
}

async fn read_file_field(multipart: &mut Multipart) -> Result<Bytes, FacePredictionError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| FacePredictionError::Upload(e.body_text()))?
    {
        if field.name() == Some(FILE_FIELD) {
            return field
                .bytes()
                .await
                .map_err(|e| FacePredictionError::Upload(e.body_text()));
        }
    }

    Err(FacePredictionError::MissingFile)
}
