//! The end-to-end run: load, prepare, split, train, evaluate, report.
//!
//! Each stage is a free function over explicit inputs; [`Pipeline`] only
//! wires them together in order.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::common::config::PipelineCfg;
use crate::common::error::{CrashError, CrashResult};
use crate::common::time::Stopwatch;
use crate::data::domain::{FeatureSet, Table, TableRepo};
use crate::data::prep::{self, PrepCfg};
use crate::data::service::{load_tables, repo_for};
use crate::data::split::{train_test_split, Split};
use crate::evaluation::domain::EvalResult;
use crate::evaluation::service::evaluate_all;
use crate::report;
use crate::training::domain::TrainedModel;
use crate::training::service::{default_trainers, train_all};

/// What a completed run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub results: Vec<EvalResult>,
    /// Accuracy lines and classification reports, ready to print.
    pub report: String,
    /// Figure path, when rendering succeeded.
    pub figure: Option<PathBuf>,
    /// JSON report path, when requested and written.
    pub report_json: Option<PathBuf>,
}

/// Fetch the configured datasets.
pub fn load(repo: &dyn TableRepo, cfg: &PipelineCfg) -> CrashResult<BTreeMap<String, Table>> {
    load_tables(repo, &cfg.datasets())
}

/// Join the two configured tables and turn them into a feature set.
pub fn prepare(tables: &BTreeMap<String, Table>, cfg: &PipelineCfg) -> CrashResult<FeatureSet> {
    let pick = |name: &str| {
        tables
            .get(name)
            .ok_or_else(|| CrashError::load(name, "dataset was not loaded"))
    };
    let prep_cfg = PrepCfg {
        key: cfg.key.clone(),
        target: cfg.target.clone(),
    };
    prep::prepare(pick(&cfg.left)?, pick(&cfg.right)?, &prep_cfg)
}

pub fn split(features: &FeatureSet, cfg: &PipelineCfg) -> CrashResult<Split> {
    train_test_split(features, cfg.test_fraction, cfg.seed)
}

pub fn train(split: &Split, cfg: &PipelineCfg) -> CrashResult<Vec<TrainedModel>> {
    train_all(&default_trainers(cfg), &split.train)
}

pub fn evaluate(models: &[TrainedModel], split: &Split) -> CrashResult<Vec<EvalResult>> {
    evaluate_all(models, &split.test)
}

/// Render text, figure and optional JSON. Presentation failures are logged
/// and reflected as `None` paths in the outcome.
pub fn report(results: Vec<EvalResult>, cfg: &PipelineCfg) -> RunOutcome {
    let text = report::render(&results);

    let figure = match report::render_heatmaps(&results, &cfg.figure) {
        Ok(()) => Some(cfg.figure.clone()),
        Err(err) => {
            warn!(error = %err, path = %cfg.figure.display(), "figure not rendered");
            None
        }
    };

    let mut report_json = None;
    if let Some(path) = &cfg.report_json {
        match report::write_json(cfg, &results, path) {
            Ok(()) => report_json = Some(path.clone()),
            Err(err) => warn!(error = %err, path = %path.display(), "json report not written"),
        }
    }

    RunOutcome {
        results,
        report: text,
        figure,
        report_json,
    }
}

/// A configured run bound to a dataset repository.
pub struct Pipeline {
    cfg: PipelineCfg,
    repo: Box<dyn TableRepo>,
}

impl Pipeline {
    /// Validate `cfg` and pick the repository for its source.
    pub fn new(cfg: PipelineCfg) -> CrashResult<Self> {
        let repo = repo_for(&cfg.source)?;
        Self::with_repo(cfg, repo)
    }

    pub fn with_repo(cfg: PipelineCfg, repo: Box<dyn TableRepo>) -> CrashResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg, repo })
    }

    pub fn run(&self) -> CrashResult<RunOutcome> {
        let cfg = &self.cfg;
        let watch = Stopwatch::start();

        let tables = load(self.repo.as_ref(), cfg)?;
        let features = prepare(&tables, cfg)?;
        let split = split(&features, cfg)?;
        let models = train(&split, cfg)?;
        let results = evaluate(&models, &split)?;
        let outcome = report(results, cfg);

        info!(dur_ms = watch.elapsed_ms() as u64, "pipeline finished");
        Ok(outcome)
    }
}
