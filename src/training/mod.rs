//! Training domain: the two classifier families and their fitting service.

pub mod domain;
pub mod service;

pub use domain::{LogisticTrainer, ModelKind, TrainedModel, Trainer, TreeTrainer};
