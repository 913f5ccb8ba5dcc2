//! Inference domain: schema-checked prediction with trained models.

pub mod domain;
pub mod service;

pub use domain::Prediction;
