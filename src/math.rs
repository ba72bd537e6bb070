//! Shared numeric helpers for the linear models and response formatting.

/// Normalize a vector in place (L2 normalization).
///
/// If the vector has zero magnitude, it remains unchanged.
pub fn l2_normalize_in_place(v: &mut [f64]) {
    let norm: f64 = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        for x in v {
            *x /= norm;
        }
    }
}

/// Normalize a vector in place so its absolute values sum to one.
pub fn l1_normalize_in_place(v: &mut [f64]) {
    let norm: f64 = v.iter().map(|x| x.abs()).sum();
    if norm > 0.0 {
        for x in v {
            *x /= norm;
        }
    }
}

/// Softmax over raw decision values, shifted by the max for numerical stability.
pub fn softmax(scores: &[f64]) -> Vec<f64> {
    if scores.is_empty() {
        return Vec::new();
    }

    let max_score = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exp_scores: Vec<f64> = scores.iter().map(|s| (s - max_score).exp()).collect();
    let sum: f64 = exp_scores.iter().sum();

    exp_scores.into_iter().map(|e| e / sum).collect()
}

/// Logistic sigmoid.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Index of the largest value. Ties resolve to the first occurrence.
pub fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// Convert a probability to a percentage rounded to two decimals.
pub fn percent(probability: f64) -> f64 {
    (probability * 100.0 * 100.0).round() / 100.0
}
