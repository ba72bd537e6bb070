//! Model artifacts and inference.
//!
//! The four artifacts (text vectorizer, text classifier, face feature
//! scaler, face classifier) are exported from the training environment as
//! JSON and loaded once at startup. Handlers only see them through the
//! traits below.

mod face;
mod linear;
mod text;

pub use face::{face_features, StandardScaler, StandardScalerFile, FACE_FEATURES, FACE_SIZE};
pub use linear::{LinearModel, LinearModelFile};
pub use text::{tokenize, Norm, TfidfFile, TfidfVectorizer};

use std::path::{Path, PathBuf};

use ndarray::{Array1, ArrayView1};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::ModelPathsConfig;

/// Converts raw text into a fixed-width numeric vector
pub trait TextVectorizer: Send + Sync {
    fn width(&self) -> usize;
    fn transform(&self, text: &str) -> Result<Array1<f64>, ModelError>;
}

/// Predicts one emotion label from a vectorized text
pub trait TextClassifier: Send + Sync {
    fn input_width(&self) -> usize;
    fn classes(&self) -> &[String];
    fn predict(&self, features: ArrayView1<f64>) -> Result<String, ModelError>;
}

/// Normalizes the flattened pixel vector before classification
pub trait FeatureScaler: Send + Sync {
    fn width(&self) -> usize;
    fn transform(&self, features: ArrayView1<f64>) -> Result<Array1<f64>, ModelError>;
}

/// Predicts a face class index, optionally with per-class probabilities
pub trait FaceClassifier: Send + Sync {
    fn input_width(&self) -> usize;
    fn classes(&self) -> &[i64];
    fn predict(&self, features: ArrayView1<f64>) -> Result<i64, ModelError>;

    /// Whether `predict_proba` yields probabilities
    fn has_probability(&self) -> bool;

    /// Probabilities in `classes()` order; `Ok(None)` when the model has
    /// no probability interface.
    fn predict_proba(&self, features: ArrayView1<f64>) -> Result<Option<Vec<f64>>, ModelError>;
}

/// Model loading and inference errors
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model artifact not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid model: {0}")]
    Invalid(String),

    #[error("Feature width mismatch: expected {expected}, got {actual}")]
    Shape { expected: usize, actual: usize },

    #[error("Cannot decode image: {0}")]
    ImageDecode(#[from] image::ImageError),
}

/// Raw output of the face pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct FaceOutput {
    /// Predicted class index
    pub class: i64,
    /// Probability per model column, when available
    pub probabilities: Option<Vec<f64>>,
}

/// The loaded, read-only model set shared by all requests
pub struct Models {
    vectorizer: Box<dyn TextVectorizer>,
    text_model: Box<dyn TextClassifier>,
    face_scaler: Box<dyn FeatureScaler>,
    face_model: Box<dyn FaceClassifier>,
}

impl std::fmt::Debug for Models {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Models")
            .field("text_width", &self.vectorizer.width())
            .field("text_classes", &self.text_model.classes())
            .field("face_classes", &self.face_model.classes())
            .finish()
    }
}

impl Models {
    /// Assemble a model set, checking that each pair agrees on its feature width.
    pub fn new(
        vectorizer: Box<dyn TextVectorizer>,
        text_model: Box<dyn TextClassifier>,
        face_scaler: Box<dyn FeatureScaler>,
        face_model: Box<dyn FaceClassifier>,
    ) -> Result<Self, ModelError> {
        if vectorizer.width() != text_model.input_width() {
            return Err(ModelError::Invalid(format!(
                "vectorizer produces {} features but the text model expects {}",
                vectorizer.width(),
                text_model.input_width()
            )));
        }
        if face_scaler.width() != FACE_FEATURES {
            return Err(ModelError::Invalid(format!(
                "face scaler expects {} features, images yield {FACE_FEATURES}",
                face_scaler.width()
            )));
        }
        if face_model.input_width() != FACE_FEATURES {
            return Err(ModelError::Invalid(format!(
                "face model expects {} features, images yield {FACE_FEATURES}",
                face_model.input_width()
            )));
        }

        Ok(Self {
            vectorizer,
            text_model,
            face_scaler,
            face_model,
        })
    }

    /// Load all four artifacts. Any missing or malformed file is an error.
    pub fn load(paths: &ModelPathsConfig) -> Result<Self, ModelError> {
        info!(
            text_model = %paths.text_model.display(),
            vectorizer = %paths.vectorizer.display(),
            face_model = %paths.face_model.display(),
            face_scaler = %paths.face_scaler.display(),
            "Loading model artifacts"
        );

        let vectorizer = TfidfVectorizer::from_file(read_artifact(&paths.vectorizer)?)?;
        let text_model = LinearModel::<String>::from_file(read_artifact(&paths.text_model)?)?;
        let face_scaler = StandardScaler::from_file(read_artifact(&paths.face_scaler)?)?;
        let face_model = LinearModel::<i64>::from_file(read_artifact(&paths.face_model)?)?;

        debug!(
            text_classes = ?text_model.classes(),
            face_classes = ?face_model.classes(),
            face_probability = face_model.has_probability(),
            "Model artifacts parsed"
        );

        Self::new(
            Box::new(vectorizer),
            Box::new(text_model),
            Box::new(face_scaler),
            Box::new(face_model),
        )
    }

    /// Vectorize and classify a piece of text
    pub fn predict_text(&self, text: &str) -> Result<String, ModelError> {
        let features = self.vectorizer.transform(text)?;
        self.text_model.predict(features.view())
    }

    /// Run the face pipeline on an encoded image
    pub fn predict_face(&self, image: &[u8]) -> Result<FaceOutput, ModelError> {
        let features = face_features(image)?;
        let scaled = self.face_scaler.transform(features.view())?;

        let class = self.face_model.predict(scaled.view())?;
        let probabilities = self.face_model.predict_proba(scaled.view())?;

        Ok(FaceOutput {
            class,
            probabilities,
        })
    }

    pub fn text_classes(&self) -> &[String] {
        self.text_model.classes()
    }

    pub fn face_classes(&self) -> &[i64] {
        self.face_model.classes()
    }

    /// Whether the face model exposes class probabilities
    pub fn face_has_probability(&self) -> bool {
        self.face_model.has_probability()
    }
}

/// Read and deserialize one JSON artifact
fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    if !path.exists() {
        return Err(ModelError::NotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_slice(&bytes).map_err(|source| ModelError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use serde_json::json;
    use std::fs;

    fn write_json(dir: &Path, name: &str, value: serde_json::Value) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();
        path
    }

    fn artifact_paths(dir: &Path) -> ModelPathsConfig {
        let text_model = write_json(
            dir,
            "text_model.json",
            json!({
                "classes": ["joy", "sadness"],
                "coef": [[1.0, 0.0], [0.0, 1.0]],
                "intercept": [0.0, 0.0]
            }),
        );
        let vectorizer = write_json(
            dir,
            "vectorizer.json",
            json!({"vocabulary": {"happy": 0, "sad": 1}, "idf": [1.0, 1.0]}),
        );
        let face_scaler = write_json(
            dir,
            "face_scaler.json",
            json!({"mean": vec![0.0; FACE_FEATURES], "scale": vec![255.0; FACE_FEATURES]}),
        );
        let face_model = write_json(
            dir,
            "face_model.json",
            json!({
                "classes": [0, 1],
                "coef": [vec![1.0; FACE_FEATURES], vec![-1.0; FACE_FEATURES]],
                "intercept": [0.0, 0.0]
            }),
        );

        ModelPathsConfig {
            text_model,
            vectorizer,
            face_model,
            face_scaler,
        }
    }

    #[test]
    fn test_load_and_predict_text() {
        let dir = tempfile::tempdir().unwrap();
        let models = Models::load(&artifact_paths(dir.path())).unwrap();

        assert_eq!(models.predict_text("so sad today").unwrap(), "sadness");
        assert_eq!(models.predict_text("happy happy").unwrap(), "joy");
        assert_eq!(models.text_classes(), ["joy", "sadness"]);
        assert!(models.face_has_probability());
    }

    #[test]
    fn test_missing_artifact_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = artifact_paths(dir.path());
        paths.face_scaler = dir.path().join("missing.json");

        let err = Models::load(&paths).unwrap_err();
        assert!(matches!(err, ModelError::NotFound(ref p) if p.ends_with("missing.json")));
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_malformed_artifact_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let paths = artifact_paths(dir.path());
        fs::write(&paths.text_model, b"{not json").unwrap();

        assert!(matches!(
            Models::load(&paths),
            Err(ModelError::Parse { .. })
        ));
    }

    #[test]
    fn test_vectorizer_width_must_match_text_model() {
        let dir = tempfile::tempdir().unwrap();
        let paths = artifact_paths(dir.path());
        write_json(
            dir.path(),
            "vectorizer.json",
            json!({"vocabulary": {"happy": 0}, "idf": [1.0, 1.0, 1.0]}),
        );

        assert!(matches!(Models::load(&paths), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn test_face_model_width_must_be_2304() {
        let result = Models::new(
            Box::new(
                TfidfVectorizer::from_file(TfidfFile {
                    vocabulary: Default::default(),
                    idf: vec![1.0],
                    lowercase: true,
                    norm: None,
                    sublinear_tf: false,
                })
                .unwrap(),
            ),
            Box::new(
                LinearModel::new(
                    vec!["a".to_string(), "b".to_string()],
                    Array2::zeros((2, 1)),
                    Array1::zeros(2),
                    false,
                )
                .unwrap(),
            ),
            Box::new(
                StandardScaler::from_file(StandardScalerFile {
                    mean: Some(vec![0.0; FACE_FEATURES]),
                    scale: None,
                })
                .unwrap(),
            ),
            Box::new(
                LinearModel::new(vec![0_i64, 1], Array2::zeros((2, 10)), Array1::zeros(2), true)
                    .unwrap(),
            ),
        );

        assert!(matches!(result, Err(ModelError::Invalid(_))));
    }

    #[test]
    fn test_predict_face_probabilities_follow_model_columns() {
        let dir = tempfile::tempdir().unwrap();
        let models = Models::load(&artifact_paths(dir.path())).unwrap();

        let img = image::RgbImage::from_pixel(10, 10, image::Rgb([255, 255, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let output = models.predict_face(&bytes).unwrap();
        assert_eq!(output.class, 0);
        let proba = output.probabilities.unwrap();
        assert_eq!(proba.len(), models.face_classes().len());
        assert!(proba[0] > proba[1]);
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }
}
