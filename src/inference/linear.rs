//! Linear classifier shared by the text and face models.

use ndarray::{Array1, Array2, ArrayView1};
use serde::Deserialize;

use super::ModelError;
use crate::math::{argmax, sigmoid, softmax};

/// On-disk layout of a linear classifier.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModelFile<L> {
    pub classes: Vec<L>,
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
    /// Whether the exported estimator exposes class probabilities
    #[serde(default = "default_probability")]
    pub probability: bool,
}

fn default_probability() -> bool {
    true
}

/// A fitted linear classifier: `coef · x + intercept`.
///
/// Two-class models may carry a single coefficient row, in which case a
/// positive decision value selects the second class.
#[derive(Debug, Clone)]
pub struct LinearModel<L> {
    classes: Vec<L>,
    coef: Array2<f64>,
    intercept: Array1<f64>,
    probability: bool,
}

impl<L: Clone> LinearModel<L> {
    pub fn new(
        classes: Vec<L>,
        coef: Array2<f64>,
        intercept: Array1<f64>,
        probability: bool,
    ) -> Result<Self, ModelError> {
        let rows = coef.nrows();

        if classes.len() < 2 {
            return Err(ModelError::Invalid(format!(
                "classifier needs at least two classes, got {}",
                classes.len()
            )));
        }
        let binary = classes.len() == 2 && rows == 1;
        if !binary && rows != classes.len() {
            return Err(ModelError::Invalid(format!(
                "coef has {rows} rows for {} classes",
                classes.len()
            )));
        }
        if intercept.len() != rows {
            return Err(ModelError::Invalid(format!(
                "intercept has {} entries for {rows} coef rows",
                intercept.len()
            )));
        }
        if coef.ncols() == 0 {
            return Err(ModelError::Invalid("coef has no columns".to_string()));
        }

        Ok(Self {
            classes,
            coef,
            intercept,
            probability,
        })
    }

    /// Build from the deserialized file, checking that rows are rectangular.
    pub fn from_file(file: LinearModelFile<L>) -> Result<Self, ModelError> {
        let rows = file.coef.len();
        let cols = file.coef.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = file.coef.iter().position(|row| row.len() != cols) {
            return Err(ModelError::Invalid(format!(
                "coef row {bad} has {} columns, expected {cols}",
                file.coef[bad].len()
            )));
        }

        let flat: Vec<f64> = file.coef.into_iter().flatten().collect();
        let coef = Array2::from_shape_vec((rows, cols), flat)
            .map_err(|e| ModelError::Invalid(format!("coef shape: {e}")))?;

        Self::new(
            file.classes,
            coef,
            Array1::from(file.intercept),
            file.probability,
        )
    }

    pub fn classes(&self) -> &[L] {
        &self.classes
    }

    /// Number of input features the model expects
    pub fn input_width(&self) -> usize {
        self.coef.ncols()
    }

    pub fn has_probability(&self) -> bool {
        self.probability
    }

    /// Raw decision values, one per coefficient row
    pub fn decision_function(&self, x: ArrayView1<f64>) -> Result<Array1<f64>, ModelError> {
        if x.len() != self.input_width() {
            return Err(ModelError::Shape {
                expected: self.input_width(),
                actual: x.len(),
            });
        }
        Ok(self.coef.dot(&x) + &self.intercept)
    }

    pub fn predict(&self, x: ArrayView1<f64>) -> Result<L, ModelError> {
        let scores = self.decision_function(x)?;

        let index = if self.is_binary() {
            usize::from(scores[0] > 0.0)
        } else {
            argmax(&scores.to_vec())
                .ok_or_else(|| ModelError::Invalid("no decision values".to_string()))?
        };

        Ok(self.classes[index].clone())
    }

    /// Per-class probabilities in `classes` order, or `None` when the
    /// estimator was exported without a probability interface.
    pub fn predict_proba(&self, x: ArrayView1<f64>) -> Result<Option<Vec<f64>>, ModelError> {
        if !self.probability {
            return Ok(None);
        }

        let scores = self.decision_function(x)?;
        let proba = if self.is_binary() {
            let p = sigmoid(scores[0]);
            vec![1.0 - p, p]
        } else {
            softmax(&scores.to_vec())
        };

        Ok(Some(proba))
    }

    fn is_binary(&self) -> bool {
        self.coef.nrows() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn three_class() -> LinearModel<String> {
        LinearModel::new(
            vec!["a".into(), "b".into(), "c".into()],
            array![[1.0, 0.0], [0.0, 1.0], [-1.0, -1.0]],
            array![0.0, 0.0, 0.5],
            true,
        )
        .unwrap()
    }

    #[test]
    fn test_predict_multiclass() {
        let model = three_class();
        assert_eq!(model.predict(array![2.0, 1.0].view()).unwrap(), "a");
        assert_eq!(model.predict(array![0.0, 3.0].view()).unwrap(), "b");
        assert_eq!(model.predict(array![0.0, 0.0].view()).unwrap(), "c");
    }

    #[test]
    fn test_predict_proba_multiclass() {
        let model = three_class();
        let proba = model.predict_proba(array![2.0, 1.0].view()).unwrap().unwrap();
        assert_eq!(proba.len(), 3);
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(proba[0] > proba[1] && proba[1] > proba[2]);
    }

    #[test]
    fn test_binary_single_row() {
        let model = LinearModel::new(
            vec![0_i64, 1],
            array![[1.0, -1.0]],
            array![0.0],
            true,
        )
        .unwrap();

        assert_eq!(model.predict(array![2.0, 1.0].view()).unwrap(), 1);
        assert_eq!(model.predict(array![1.0, 2.0].view()).unwrap(), 0);

        let proba = model.predict_proba(array![2.0, 1.0].view()).unwrap().unwrap();
        assert_eq!(proba.len(), 2);
        assert!(proba[1] > 0.5);
        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_probability_interface() {
        let model = LinearModel::new(
            vec![0_i64, 1, 2],
            Array2::zeros((3, 4)),
            Array1::zeros(3),
            false,
        )
        .unwrap();
        assert!(!model.has_probability());
        assert!(model.predict_proba(Array1::zeros(4).view()).unwrap().is_none());
    }

    #[test]
    fn test_wrong_input_width() {
        let model = three_class();
        let err = model.predict(array![1.0, 2.0, 3.0].view()).unwrap_err();
        assert!(matches!(err, ModelError::Shape { expected: 2, actual: 3 }));
    }

    #[test]
    fn test_rejects_mismatched_intercept() {
        let result = LinearModel::new(
            vec![0_i64, 1, 2],
            Array2::zeros((3, 2)),
            Array1::zeros(2),
            true,
        );
        assert!(matches!(result, Err(ModelError::Invalid(_))));
    }

    #[test]
    fn test_from_file_rejects_ragged_rows() {
        let file: LinearModelFile<i64> = serde_json::from_str(
            r#"{"classes": [0, 1, 2], "coef": [[1, 2], [3], [4, 5]], "intercept": [0, 0, 0]}"#,
        )
        .unwrap();
        assert!(matches!(
            LinearModel::from_file(file),
            Err(ModelError::Invalid(_))
        ));
    }

    #[test]
    fn test_from_file_defaults_probability_on() {
        let file: LinearModelFile<String> = serde_json::from_str(
            r#"{"classes": ["x", "y"], "coef": [[1.0], [2.0]], "intercept": [0.0, 0.0]}"#,
        )
        .unwrap();
        let model = LinearModel::from_file(file).unwrap();
        assert!(model.has_probability());
        assert_eq!(model.input_width(), 1);
    }
}
