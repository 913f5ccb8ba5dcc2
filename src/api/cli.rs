//! Command line entry point.
//!
//! Every flag can also be set through a `CRASHSEV_*` environment variable.

use std::path::PathBuf;

use clap::Parser;
use tracing::error;

use crate::common::config::{PipelineCfg, DEFAULT_SOURCE};
use crate::common::error::ErrorCode;
use crate::common::log;
use crate::pipeline::Pipeline;

#[derive(Debug, Parser)]
#[command(
    name = "crash-severity",
    version,
    about = "Predict severe crashes from joined crash-record tables"
)]
pub struct Cli {
    /// URL or path prefix; `<source><dataset>.csv` is fetched per dataset.
    #[arg(long, env = "CRASHSEV_SOURCE", default_value = DEFAULT_SOURCE)]
    pub source: String,

    /// Load every catalogued dataset, not just the two joined ones.
    #[arg(long, env = "CRASHSEV_ALL_DATASETS")]
    pub all_datasets: bool,

    #[arg(long, env = "CRASHSEV_LEFT", default_value = "accident")]
    pub left: String,

    #[arg(long, env = "CRASHSEV_RIGHT", default_value = "person")]
    pub right: String,

    /// Join key shared by both tables.
    #[arg(long, env = "CRASHSEV_KEY", default_value = "caseid")]
    pub key: String,

    /// Binary target column.
    #[arg(long, env = "CRASHSEV_TARGET", default_value = "severe_crash")]
    pub target: String,

    /// Held-out fraction of rows.
    #[arg(long, env = "CRASHSEV_TEST_SIZE", default_value_t = 0.2)]
    pub test_size: f64,

    #[arg(long, env = "CRASHSEV_SEED", default_value_t = 42)]
    pub seed: u64,

    /// Iteration cap for the logistic regression optimiser.
    #[arg(long, env = "CRASHSEV_MAX_ITER", default_value_t = 1000)]
    pub max_iter: u64,

    /// Output path of the confusion-matrix figure (SVG).
    #[arg(
        long,
        env = "CRASHSEV_FIGURE",
        default_value = "confusion_matrices.svg"
    )]
    pub figure: PathBuf,

    /// Also write metrics as JSON to this path.
    #[arg(long, env = "CRASHSEV_REPORT_JSON")]
    pub report_json: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, env = "CRASHSEV_LOG", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long, env = "CRASHSEV_LOG_JSON")]
    pub log_json: bool,
}

impl Cli {
    pub fn into_cfg(self) -> PipelineCfg {
        PipelineCfg {
            source: self.source,
            all_datasets: self.all_datasets,
            left: self.left,
            right: self.right,
            key: self.key,
            target: self.target,
            test_fraction: self.test_size,
            seed: self.seed,
            max_iterations: self.max_iter,
            figure: self.figure,
            report_json: self.report_json,
        }
    }
}

/// Parse arguments, run the pipeline and print the report. Returns the
/// process exit code.
pub fn run() -> u8 {
    let cli = Cli::parse();
    log::init(&cli.log_level, cli.log_json);

    let outcome = Pipeline::new(cli.into_cfg()).and_then(|p| p.run());
    match outcome {
        Ok(outcome) => {
            print!("{}", outcome.report);
            ErrorCode::Ok as u8
        }
        Err(err) => {
            error!(code = err.code() as u8, "{err}");
            err.code() as u8
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pipeline_defaults() {
        let cli = Cli::parse_from(["crash-severity"]);
        let cfg = cli.into_cfg();
        let expected = PipelineCfg::default();
        assert_eq!(cfg.source, expected.source);
        assert_eq!(cfg.left, expected.left);
        assert_eq!(cfg.right, expected.right);
        assert_eq!(cfg.seed, expected.seed);
        assert_eq!(cfg.test_fraction, expected.test_fraction);
        assert_eq!(cfg.max_iterations, expected.max_iterations);
        assert_eq!(cfg.figure, expected.figure);
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "crash-severity",
            "--source",
            "data/",
            "--seed",
            "7",
            "--test-size",
            "0.25",
            "--report-json",
            "out.json",
        ]);
        let cfg = cli.into_cfg();
        assert_eq!(cfg.source, "data/");
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.test_fraction, 0.25);
        assert_eq!(cfg.report_json, Some(PathBuf::from("out.json")));
    }
}
