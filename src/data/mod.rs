//! Data domain: loading raw tables, joining and cleaning them, and splitting
//! the resulting feature matrix.

pub mod domain;
pub mod prep;
pub mod repo_fs;
pub mod repo_http;
pub mod service;
pub mod split;

pub use domain::{Column, ColumnData, ColumnKind, FeatureSet, Table, TableRepo};
pub use prep::PrepCfg;
pub use split::Split;
