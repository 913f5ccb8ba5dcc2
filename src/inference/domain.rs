//! Prediction output of a trained model.

use ndarray::Array1;

use crate::training::domain::ModelKind;

/// Predicted class labels for every row of a feature matrix, in row order.
#[derive(Clone, Debug)]
pub struct Prediction {
    pub model: ModelKind,
    pub labels: Array1<usize>,
}

impl Prediction {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
