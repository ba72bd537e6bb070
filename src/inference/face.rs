//! Face emotion model: image preprocessing, standard scaler and linear face classifier.

use image::imageops::{self, FilterType};
use ndarray::{Array1, ArrayView1};
use serde::Deserialize;

use super::linear::LinearModel;
use super::{FaceClassifier, FeatureScaler, ModelError};

/// Side length of the square canvas faces are resized to
pub const FACE_SIZE: u32 = 48;

/// Length of the flattened grayscale feature vector (48 x 48)
pub const FACE_FEATURES: usize = (FACE_SIZE * FACE_SIZE) as usize;

/// Decode an uploaded image and turn it into the flattened grayscale
/// feature vector the face model was trained on.
///
/// The image is converted to RGB, resized to 48x48 with a bicubic filter,
/// reduced to ITU-R 601-2 luma and flattened row by row.
pub fn face_features(bytes: &[u8]) -> Result<Array1<f64>, ModelError> {
    let rgb = image::load_from_memory(bytes)?.to_rgb8();
    let resized = imageops::resize(&rgb, FACE_SIZE, FACE_SIZE, FilterType::CatmullRom);

    let features: Vec<f64> = resized
        .pixels()
        .map(|pixel| {
            let [r, g, b] = pixel.0;
            f64::from(luma(r, g, b))
        })
        .collect();

    Ok(Array1::from(features))
}

/// ITU-R 601-2 luma transform in 16-bit fixed point.
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let l = u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471 + 0x8000;
    (l >> 16) as u8
}

/// On-disk layout of a fitted standard scaler.
#[derive(Debug, Clone, Deserialize)]
pub struct StandardScalerFile {
    #[serde(default)]
    pub mean: Option<Vec<f64>>,
    #[serde(default)]
    pub scale: Option<Vec<f64>>,
}

/// Per-feature standardization: `(x - mean) / scale`.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Option<Array1<f64>>,
    scale: Option<Array1<f64>>,
    width: usize,
}

impl StandardScaler {
    pub fn from_file(file: StandardScalerFile) -> Result<Self, ModelError> {
        let width = match (&file.mean, &file.scale) {
            (Some(mean), Some(scale)) if mean.len() != scale.len() => {
                return Err(ModelError::Invalid(format!(
                    "scaler mean has {} entries but scale has {}",
                    mean.len(),
                    scale.len()
                )));
            }
            (Some(mean), _) => mean.len(),
            (None, Some(scale)) => scale.len(),
            (None, None) => {
                return Err(ModelError::Invalid(
                    "scaler has neither mean nor scale".to_string(),
                ));
            }
        };

        // Constant features were fitted with a zero scale; leave them unscaled.
        let scale = file.scale.map(|scale| {
            scale
                .into_iter()
                .map(|s| if s == 0.0 { 1.0 } else { s })
                .collect::<Array1<f64>>()
        });

        Ok(Self {
            mean: file.mean.map(Array1::from),
            scale,
            width,
        })
    }
}

impl FeatureScaler for StandardScaler {
    fn width(&self) -> usize {
        self.width
    }

    fn transform(&self, features: ArrayView1<f64>) -> Result<Array1<f64>, ModelError> {
        if features.len() != self.width {
            return Err(ModelError::Shape {
                expected: self.width,
                actual: features.len(),
            });
        }

        let mut scaled = features.to_owned();
        if let Some(mean) = &self.mean {
            scaled -= mean;
        }
        if let Some(scale) = &self.scale {
            scaled /= scale;
        }
        Ok(scaled)
    }
}

impl FaceClassifier for LinearModel<i64> {
    fn input_width(&self) -> usize {
        LinearModel::input_width(self)
    }

    fn classes(&self) -> &[i64] {
        LinearModel::classes(self)
    }

    fn predict(&self, features: ArrayView1<f64>) -> Result<i64, ModelError> {
        LinearModel::predict(self, features)
    }

    fn has_probability(&self) -> bool {
        LinearModel::has_probability(self)
    }

    fn predict_proba(&self, features: ArrayView1<f64>) -> Result<Option<Vec<f64>>, ModelError> {
        LinearModel::predict_proba(self, features)
    }
}
