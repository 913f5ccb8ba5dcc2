//! Inference guarded by the model's training schema.

use tracing::debug;

use crate::common::error::{CrashError, CrashResult};
use crate::data::domain::FeatureSet;
use crate::training::domain::TrainedModel;

use super::domain::Prediction;

/// Predict labels for every row of `features`.
///
/// The feature columns must match the training schema exactly, names and
/// order both.
pub fn predict(model: &TrainedModel, features: &FeatureSet) -> CrashResult<Prediction> {
    if model.schema() != features.names.as_slice() {
        let expected = model.schema().len();
        let got = features.names.len();
        let first_diff = model
            .schema()
            .iter()
            .zip(&features.names)
            .position(|(a, b)| a != b)
            .unwrap_or(expected.min(got));
        return Err(CrashError::schema(format!(
            "{} expects {expected} features, got {got} (first mismatch at column {first_diff})",
            model.kind()
        )));
    }
    let labels = model.predict_matrix(&features.x);
    debug!(
        model = model.kind().as_str(),
        rows = labels.len(),
        "predicted"
    );
    Ok(Prediction {
        model: model.kind(),
        labels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::domain::{Trainer, TreeTrainer};
    use ndarray::array;

    fn data() -> FeatureSet {
        FeatureSet::new(
            vec!["a".into(), "b".into()],
            array![[0.0, 1.0], [0.0, 2.0], [5.0, 1.0], [5.0, 2.0]],
            array![0, 0, 1, 1],
        )
        .unwrap()
    }

    #[test]
    fn predicts_one_label_per_row() {
        let data = data();
        let model = TreeTrainer::default().fit(&data).unwrap();
        let pred = predict(&model, &data).unwrap();
        assert_eq!(pred.len(), 4);
        assert_eq!(pred.labels, data.y);
    }

    #[test]
    fn reordered_columns_are_rejected() {
        let data = data();
        let model = TreeTrainer::default().fit(&data).unwrap();
        let names = vec!["b".into(), "a".into()];
        let (x, y) = (data.x.clone(), data.y.clone());
        let swapped = FeatureSet::new(names, x, y).unwrap();
        let err = predict(&model, &swapped).unwrap_err();
        assert!(matches!(err, CrashError::Schema(_)));
    }
}
