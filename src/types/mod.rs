//! Request and response types for the HTTP API.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub models: ModelSummary,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}

/// Summary of the loaded artifacts
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub text_classes: Vec<String>,
    pub face_classes: Vec<i64>,
    pub face_probabilities: bool,
}

/// Form body of `POST /predict-text-emotion`
#[derive(Debug, Clone, Deserialize)]
pub struct TextEmotionForm {
    pub user_input: String,
}

/// Overall confidence of a face prediction.
///
/// Serialized as a percentage, or as the string `"0"` when the face model
/// has no probability interface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Confidence {
    Percent(f64),
    Unavailable,
}

impl Serialize for Confidence {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Percent(value) => serializer.serialize_f64(*value),
            Self::Unavailable => serializer.serialize_str("0"),
        }
    }
}

/// Body of a successful `POST /predict-face`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacePredictionResponse {
    pub primary_emotion: String,
    pub emoji: String,
    pub confidence: Confidence,
    /// Emotion name -> probability percentage
    pub scores: BTreeMap<String, f64>,
    pub suggestions: Vec<String>,
}

/// Body of a failed `POST /predict-face`
#[derive(Debug, Clone, Serialize)]
pub struct PredictionErrorResponse {
    pub error: String,
}
