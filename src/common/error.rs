//! Error handling primitives shared across the pipeline.
//!
//! Every failure carries a stable [`ErrorCode`] so the binary can map it to a
//! process exit status without string matching.

use thiserror::Error;

/// Stable error codes, also used as process exit codes.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorCode {
    /// Success code used as a sentinel.
    Ok = 0,
    /// A dataset could not be fetched or parsed.
    Load = 2,
    /// A required column was absent or had the wrong shape.
    Schema = 3,
    /// A statistic was degenerate (e.g. mean of an all-missing column).
    Numeric = 4,
    /// Invalid pipeline configuration.
    Config = 5,
    /// A model failed to fit.
    Model = 6,
    /// Rendering or writing a report artefact failed.
    Presentation = 7,
    /// Local IO outside of dataset loading.
    Io = 8,
}

/// Canonical error type for the crate.
#[derive(Debug, Error)]
pub enum CrashError {
    #[error("failed to load dataset `{dataset}`: {reason}")]
    Load { dataset: String, reason: String },

    #[error("schema error: {0}")]
    Schema(String),

    #[error("numeric error: {0}")]
    Numeric(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{model} failed to fit: {reason}")]
    Model { model: &'static str, reason: String },

    #[error("presentation error: {0}")]
    Presentation(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type CrashResult<T> = Result<T, CrashError>;

impl CrashError {
    /// Load helper naming the offending dataset.
    pub fn load(dataset: impl Into<String>, reason: impl ToString) -> Self {
        Self::Load {
            dataset: dataset.into(),
            reason: reason.to_string(),
        }
    }

    /// Schema helper.
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    /// Numeric helper.
    pub fn numeric(msg: impl Into<String>) -> Self {
        Self::Numeric(msg.into())
    }

    /// Config helper.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Model fitting helper.
    pub fn model(model: &'static str, reason: impl ToString) -> Self {
        Self::Model {
            model,
            reason: reason.to_string(),
        }
    }

    /// Presentation helper.
    pub fn presentation(reason: impl ToString) -> Self {
        Self::Presentation(reason.to_string())
    }

    /// Machine readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Load { .. } => ErrorCode::Load,
            Self::Schema(_) => ErrorCode::Schema,
            Self::Numeric(_) => ErrorCode::Numeric,
            Self::Config(_) => ErrorCode::Config,
            Self::Model { .. } => ErrorCode::Model,
            Self::Presentation(_) => ErrorCode::Presentation,
            Self::Io(_) => ErrorCode::Io,
        }
    }

    /// Whether the pipeline may continue after this error.
    ///
    /// Only presentation failures are recoverable; metrics are already computed
    /// by the time anything is rendered.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Presentation(_))
    }
}
