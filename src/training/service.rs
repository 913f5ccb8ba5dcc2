//! Service layer fitting every configured model on the same training rows.

use tracing::info;

use crate::common::config::PipelineCfg;
use crate::common::error::CrashResult;
use crate::common::time::Stopwatch;
use crate::data::domain::FeatureSet;

use super::domain::{LogisticTrainer, TrainedModel, Trainer, TreeTrainer};

/// The two models of a pipeline run, in report order.
pub fn default_trainers(cfg: &PipelineCfg) -> Vec<Box<dyn Trainer>> {
    vec![
        Box::new(LogisticTrainer {
            max_iterations: cfg.max_iterations,
        }),
        Box::new(TreeTrainer {
            seed: cfg.seed,
            max_depth: None,
        }),
    ]
}

/// Fit each trainer in order on the identical training partition.
pub fn train_all(
    trainers: &[Box<dyn Trainer>],
    train: &FeatureSet,
) -> CrashResult<Vec<TrainedModel>> {
    trainers
        .iter()
        .map(|trainer| {
            let watch = Stopwatch::start();
            let model = trainer.fit(train)?;
            info!(
                model = trainer.kind().as_str(),
                seed = ?model.seed(),
                rows = train.n_rows(),
                features = train.names.len(),
                dur_ms = watch.elapsed_ms() as u64,
                "model trained"
            );
            Ok(model)
        })
        .collect()
}
