//! Reporting: printed metrics, confusion-matrix figure and JSON output.
//!
//! Everything here is presentational; failures surface as
//! [`CrashError::Presentation`](crate::common::error::CrashError) and never
//! affect computed metrics.

pub mod heatmap;
pub mod json;
pub mod text;

pub use heatmap::render_heatmaps;
pub use json::write_json;
pub use text::{format_accuracy, render};
