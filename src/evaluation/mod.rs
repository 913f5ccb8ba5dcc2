//! Evaluation: accuracy, per-class report and confusion matrices.

pub mod domain;
pub mod service;

pub use domain::{ClassificationReport, ConfusionMatrix, EvalResult};
