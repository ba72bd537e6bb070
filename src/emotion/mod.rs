//! Maps raw model outputs to emotion names, emoji and suggestions.

pub mod tables;

pub use tables::{
    emoji_for, emotion_info, face_label, is_known_face_class, suggestions_for, EmotionInfo,
    EMOTIONS, FACE_EMOJI_FALLBACK, FACE_LABELS, TEXT_EMOJI_FALLBACK, UNKNOWN_LABEL,
};

use std::collections::BTreeMap;

use crate::inference::FaceOutput;
use crate::math::percent;
use crate::types::{Confidence, FacePredictionResponse};

/// A text prediction ready for display
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrediction {
    /// Label as produced by the text model
    pub label: String,
    pub emoji: &'static str,
    pub suggestions: &'static [&'static str],
}

impl TextPrediction {
    /// The text model's labels are used directly as table keys.
    pub fn from_label(label: String) -> Self {
        let emoji = emoji_for(&label).unwrap_or(TEXT_EMOJI_FALLBACK);
        let suggestions = suggestions_for(&label);
        Self {
            label,
            emoji,
            suggestions,
        }
    }
}

/// Build the face prediction body from the raw face pipeline output.
///
/// Confidence is the largest probability over all columns. Scores are keyed
/// by probability column position looked up in the label map, not by the
/// model's class values; columns outside the map are left out.
pub fn describe_face(output: &FaceOutput) -> FacePredictionResponse {
    let label = face_label(output.class);

    let (confidence, scores) = match &output.probabilities {
        Some(probabilities) => {
            let max = probabilities.iter().copied().fold(0.0_f64, f64::max);

            let scores = probabilities
                .iter()
                .enumerate()
                .filter_map(|(column, p)| {
                    let column = i64::try_from(column).ok()?;
                    is_known_face_class(column)
                        .then(|| (face_label(column).to_string(), percent(*p)))
                })
                .collect();

            (Confidence::Percent(percent(max)), scores)
        }
        None => (Confidence::Unavailable, BTreeMap::new()),
    };

    FacePredictionResponse {
        primary_emotion: label.to_string(),
        emoji: emoji_for(label).unwrap_or(FACE_EMOJI_FALLBACK).to_string(),
        confidence,
        scores,
        suggestions: suggestions_for(label)
            .iter()
            .map(|s| s.to_string())
            .collect(),
    }
}
