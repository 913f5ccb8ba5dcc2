//! Shared utilities that glue the different stages together.
pub mod config;
pub mod error;
pub mod ids;
pub mod log;
pub mod time;

pub use error::{CrashError, CrashResult, ErrorCode};
