//! Evaluation of trained models on the held-out partition.

use tracing::info;

use crate::common::error::CrashResult;
use crate::data::domain::FeatureSet;
use crate::inference::service::predict;
use crate::training::domain::TrainedModel;

use super::domain::{ClassificationReport, ConfusionMatrix, EvalResult};

/// Predict the test rows and score them against the true labels.
pub fn evaluate(model: &TrainedModel, test: &FeatureSet) -> CrashResult<EvalResult> {
    let prediction = predict(model, test)?;
    let actual = test.y.to_vec();
    let predicted = prediction.labels.to_vec();
    let confusion = ConfusionMatrix::from_labels(&actual, &predicted);
    let report = ClassificationReport::from_matrix(&confusion);
    info!(
        model = model.kind().as_str(),
        rows = confusion.total(),
        accuracy = report.accuracy,
        "model evaluated"
    );
    Ok(EvalResult {
        model: model.kind(),
        accuracy: report.accuracy,
        report,
        confusion,
    })
}

/// Evaluate every model against the identical test partition.
pub fn evaluate_all(models: &[TrainedModel], test: &FeatureSet) -> CrashResult<Vec<EvalResult>> {
    models.iter().map(|m| evaluate(m, test)).collect()
}
