//! Runtime configuration for a pipeline run.
//!
//! Values come from the CLI (which also reads `CRASHSEV_*` environment
//! variables); `Default` reproduces the constants of the original analysis.

use std::path::PathBuf;

use serde::Serialize;

use crate::common::error::{CrashError, CrashResult};

/// Default retrieval location; dataset names are appended verbatim plus `.csv`.
pub const DEFAULT_SOURCE: &str =
    "https://github.com/Maneater00/Traffic_Crash_Data_Analysis/new/main";

/// Every dataset published alongside the crash records.
pub const DATASET_CATALOGUE: &[&str] = &[
    "accident",
    "cevent",
    "crashrf",
    "damage",
    "distract",
    "drimpair",
    "driverrf",
    "drugs",
    "factor",
    "maneuver",
    "nmcrash",
    "nmdistract",
    "nmimpair",
    "nmprior",
    "parkwork",
    "pbtype",
    "person",
    "personrf",
    "pvehiclesf",
    "race",
    "safetyeq",
    "vehicle",
    "vehiclesf",
    "vevent",
    "violatn",
    "vision",
    "vpicdecode",
    "vpictrailerdecode",
    "vsoe",
    "weather",
    "miacc",
    "midrvacc",
    "miper",
];

/// Snapshot of configuration values consumed by the pipeline.
#[derive(Clone, Debug, Serialize)]
pub struct PipelineCfg {
    /// URL or path prefix datasets are resolved against.
    pub source: String,
    /// Load the whole catalogue instead of only the joined tables.
    pub all_datasets: bool,
    pub left: String,
    pub right: String,
    pub key: String,
    pub target: String,
    pub test_fraction: f64,
    pub seed: u64,
    pub max_iterations: u64,
    /// Where the confusion-matrix figure is written.
    pub figure: PathBuf,
    pub report_json: Option<PathBuf>,
}

impl Default for PipelineCfg {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            all_datasets: false,
            left: "accident".to_string(),
            right: "person".to_string(),
            key: "caseid".to_string(),
            target: "severe_crash".to_string(),
            test_fraction: 0.2,
            seed: 42,
            max_iterations: 1000,
            figure: PathBuf::from("confusion_matrices.svg"),
            report_json: None,
        }
    }
}

impl PipelineCfg {
    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> CrashResult<()> {
        for (field, value) in [
            ("source", &self.source),
            ("left", &self.left),
            ("right", &self.right),
            ("key", &self.key),
            ("target", &self.target),
        ] {
            if value.trim().is_empty() {
                return Err(CrashError::config(format!("`{field}` must not be empty")));
            }
        }
        if self.left == self.right {
            return Err(CrashError::config(format!(
                "cannot join `{}` with itself",
                self.left
            )));
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(CrashError::config(format!(
                "test fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }
        if self.max_iterations == 0 {
            return Err(CrashError::config("max iterations must be > 0"));
        }
        Ok(())
    }

    /// Dataset names the loader should request.
    pub fn datasets(&self) -> Vec<String> {
        let mut names: Vec<String> = if self.all_datasets {
            DATASET_CATALOGUE.iter().map(|s| s.to_string()).collect()
        } else {
            Vec::new()
        };
        for joined in [&self.left, &self.right] {
            if !names.contains(joined) {
                names.push(joined.clone());
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_run() {
        let cfg = PipelineCfg::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.max_iterations, 1000);
        assert_eq!(
            cfg.datasets(),
            vec!["accident".to_string(), "person".to_string()]
        );
    }

    #[test]
    fn catalogue_includes_joined_tables_once() {
        let cfg = PipelineCfg {
            all_datasets: true,
            ..PipelineCfg::default()
        };
        let names = cfg.datasets();
        assert_eq!(names.len(), DATASET_CATALOGUE.len());
        assert_eq!(names.iter().filter(|n| *n == "person").count(), 1);
    }

    #[test]
    fn rejects_bad_fraction_and_self_join() {
        let cfg = PipelineCfg {
            test_fraction: 1.0,
            ..PipelineCfg::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = PipelineCfg {
            right: "accident".into(),
            ..PipelineCfg::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = PipelineCfg {
            max_iterations: 0,
            ..PipelineCfg::default()
        };
        assert!(cfg.validate().is_err());
    }
}
