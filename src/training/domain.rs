//! Domain types for model training.

use std::fmt;

use linfa::prelude::*;
use linfa::Dataset;
use linfa_logistic::{FittedLogisticRegression, LogisticRegression};
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2, Ix1};
use serde::Serialize;

use crate::common::error::{CrashError, CrashResult};
use crate::data::domain::FeatureSet;

/// Supported model families.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    LogisticRegression,
    DecisionTree,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::LogisticRegression => "logistic_regression",
            ModelKind::DecisionTree => "decision_tree",
        }
    }

    /// Name used in printed reports and figure titles.
    pub fn display_name(&self) -> &'static str {
        match self {
            ModelKind::LogisticRegression => "Logistic Regression",
            ModelKind::DecisionTree => "Decision Tree",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

enum Fitted {
    Logistic(FittedLogisticRegression<f64, usize>),
    Tree(DecisionTree<f64, usize>),
}

/// Fitted classifier bound to the feature schema it was trained on.
pub struct TrainedModel {
    kind: ModelKind,
    schema: Vec<String>,
    seed: Option<u64>,
    fitted: Fitted,
}

impl TrainedModel {
    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    /// Feature column names, in the order the model expects them.
    pub fn schema(&self) -> &[String] {
        &self.schema
    }

    /// Seed the model was fitted under, for models that take one.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Raw prediction on a matrix already known to match the schema.
    pub(crate) fn predict_matrix(&self, x: &Array2<f64>) -> Array1<usize> {
        match &self.fitted {
            Fitted::Logistic(model) => model.predict(x),
            Fitted::Tree(model) => model.predict(x),
        }
    }
}

impl fmt::Debug for TrainedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrainedModel")
            .field("kind", &self.kind)
            .field("features", &self.schema.len())
            .field("seed", &self.seed)
            .finish()
    }
}

/// Interface for components that can fit a classifier.
pub trait Trainer {
    fn kind(&self) -> ModelKind;
    fn fit(&self, train: &FeatureSet) -> CrashResult<TrainedModel>;
}

fn dataset(train: &FeatureSet) -> CrashResult<Dataset<f64, usize, Ix1>> {
    if train.n_rows() == 0 {
        return Err(CrashError::config("cannot train on an empty partition"));
    }
    Ok(Dataset::new(train.x.clone(), train.y.clone()))
}

/// L2-regularised logistic regression fitted with L-BFGS.
///
/// Stopping at `max_iterations` without converging still yields a model.
#[derive(Clone, Debug)]
pub struct LogisticTrainer {
    pub max_iterations: u64,
}

impl Default for LogisticTrainer {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
        }
    }
}

impl Trainer for LogisticTrainer {
    fn kind(&self) -> ModelKind {
        ModelKind::LogisticRegression
    }

    fn fit(&self, train: &FeatureSet) -> CrashResult<TrainedModel> {
        let data = dataset(train)?;
        let model = LogisticRegression::default()
            .max_iterations(self.max_iterations)
            .fit(&data)
            .map_err(|e| CrashError::model(self.kind().display_name(), e))?;
        Ok(TrainedModel {
            kind: self.kind(),
            schema: train.names.clone(),
            seed: None,
            fitted: Fitted::Logistic(model),
        })
    }
}

/// Gini CART decision tree.
///
/// The splitter scans features in column order and keeps the first best
/// split, so fits are reproducible. `seed` is stamped on the fitted model
/// and logged with it.
#[derive(Clone, Debug)]
pub struct TreeTrainer {
    pub seed: u64,
    pub max_depth: Option<usize>,
}

impl Default for TreeTrainer {
    fn default() -> Self {
        Self {
            seed: 42,
            max_depth: None,
        }
    }
}

impl Trainer for TreeTrainer {
    fn kind(&self) -> ModelKind {
        ModelKind::DecisionTree
    }

    fn fit(&self, train: &FeatureSet) -> CrashResult<TrainedModel> {
        let data = dataset(train)?;
        let model = DecisionTree::<f64, usize>::params()
            .max_depth(self.max_depth)
            .fit(&data)
            .map_err(|e| CrashError::model(self.kind().display_name(), e))?;
        Ok(TrainedModel {
            kind: self.kind(),
            schema: train.names.clone(),
            seed: Some(self.seed),
            fitted: Fitted::Tree(model),
        })
    }
}
