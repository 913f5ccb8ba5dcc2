//! Structured metrics output for non-interactive runs.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::common::config::PipelineCfg;
use crate::common::error::{CrashError, CrashResult};
use crate::evaluation::domain::EvalResult;

#[derive(Serialize)]
struct RunReport<'a> {
    config: &'a PipelineCfg,
    results: &'a [EvalResult],
}

/// Serialise the run configuration and every evaluation result.
pub fn to_json(cfg: &PipelineCfg, results: &[EvalResult]) -> CrashResult<String> {
    serde_json::to_string_pretty(&RunReport {
        config: cfg,
        results,
    })
    .map_err(CrashError::presentation)
}

/// Write the JSON report to `path`.
pub fn write_json(cfg: &PipelineCfg, results: &[EvalResult], path: &Path) -> CrashResult<()> {
    let body = to_json(cfg, results)?;
    let mut out = BufWriter::new(File::create(path).map_err(CrashError::presentation)?);
    out.write_all(body.as_bytes())
        .and_then(|_| out.flush())
        .map_err(CrashError::presentation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::domain::{ClassificationReport, ConfusionMatrix};
    use crate::training::domain::ModelKind;

    #[test]
    fn json_carries_model_and_matrix() {
        let m = ConfusionMatrix::from_labels(&[0, 1, 1], &[0, 1, 0]);
        let result = EvalResult {
            model: ModelKind::LogisticRegression,
            accuracy: m.accuracy(),
            report: ClassificationReport::from_matrix(&m),
            confusion: m,
        };
        let json = to_json(&PipelineCfg::default(), &[result]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["results"][0]["model"], "logistic_regression");
        assert_eq!(value["results"][0]["confusion"]["counts"][1][0], 1);
        assert_eq!(value["config"]["seed"], 42);
    }
}
