//! Text emotion model: TF-IDF vectorizer and linear text classifier.

use std::collections::HashMap;

use ndarray::{Array1, ArrayView1};
use serde::Deserialize;

use super::linear::LinearModel;
use super::{ModelError, TextClassifier, TextVectorizer};
use crate::math::{l1_normalize_in_place, l2_normalize_in_place};

/// Row normalization applied after TF-IDF weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// On-disk layout of a fitted TF-IDF vectorizer.
#[derive(Debug, Clone, Deserialize)]
pub struct TfidfFile {
    /// Term -> column index
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per column
    pub idf: Vec<f64>,
    #[serde(default = "default_lowercase")]
    pub lowercase: bool,
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
    #[serde(default)]
    pub sublinear_tf: bool,
}

fn default_lowercase() -> bool {
    true
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

/// Bag-of-words TF-IDF vectorizer.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    lowercase: bool,
    norm: Option<Norm>,
    sublinear_tf: bool,
}

impl TfidfVectorizer {
    pub fn from_file(file: TfidfFile) -> Result<Self, ModelError> {
        if file.idf.is_empty() {
            return Err(ModelError::Invalid("vectorizer has an empty idf".to_string()));
        }
        if let Some((term, column)) = file
            .vocabulary
            .iter()
            .find(|(_, column)| **column >= file.idf.len())
        {
            return Err(ModelError::Invalid(format!(
                "vocabulary term {term:?} maps to column {column}, but idf has {} entries",
                file.idf.len()
            )));
        }

        Ok(Self {
            vocabulary: file.vocabulary,
            idf: file.idf,
            lowercase: file.lowercase,
            norm: file.norm,
            sublinear_tf: file.sublinear_tf,
        })
    }
}

/// Split text into word tokens: runs of alphanumerics or underscores, at
/// least two characters long.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().nth(1).is_some())
}

impl TextVectorizer for TfidfVectorizer {
    fn width(&self) -> usize {
        self.idf.len()
    }

    fn transform(&self, text: &str) -> Result<Array1<f64>, ModelError> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let mut counts = vec![0.0_f64; self.width()];
        for token in tokenize(&text) {
            if let Some(&column) = self.vocabulary.get(token) {
                counts[column] += 1.0;
            }
        }

        let mut weights: Vec<f64> = counts
            .into_iter()
            .zip(&self.idf)
            .map(|(tf, idf)| {
                if tf == 0.0 {
                    0.0
                } else if self.sublinear_tf {
                    (1.0 + tf.ln()) * idf
                } else {
                    tf * idf
                }
            })
            .collect();

        match self.norm {
            Some(Norm::L2) => l2_normalize_in_place(&mut weights),
            Some(Norm::L1) => l1_normalize_in_place(&mut weights),
            None => {}
        }

        Ok(Array1::from(weights))
    }
}

impl TextClassifier for LinearModel<String> {
    fn input_width(&self) -> usize {
        LinearModel::input_width(self)
    }

    fn classes(&self) -> &[String] {
        LinearModel::classes(self)
    }

    fn predict(&self, features: ArrayView1<f64>) -> Result<String, ModelError> {
        LinearModel::predict(self, features)
    }
}
