// lib.rs - load, join, train and evaluate crash severity classifiers
pub mod api;
pub mod common;
pub mod data;
pub mod evaluation;
pub mod inference;
pub mod pipeline;
pub mod report;
pub mod training;

pub use common::config::PipelineCfg;
pub use common::error::{CrashError, CrashResult};
pub use pipeline::{Pipeline, RunOutcome};
