//! End-to-end runs over small synthetic crash tables on disk.

use std::fs;
use std::path::Path;

use crash_severity::common::config::PipelineCfg;
use crash_severity::data::split::test_len;
use crash_severity::training::ModelKind;
use crash_severity::{CrashError, Pipeline};
use tempfile::TempDir;

const ACCIDENT: &str = "\
caseid,speed,weather
1,35,clear
2,,rain
3,70,snow
4,65,rain
5,30,clear
";

const PERSON: &str = "\
caseid,age,severe_crash
1,34,0
2,51,1
3,,1
4,46,1
5,22,0
";

fn write_tables(dir: &Path, accident: &str, person: &str) {
    fs::write(dir.join("accident.csv"), accident).unwrap();
    fs::write(dir.join("person.csv"), person).unwrap();
}

fn cfg_for(dir: &TempDir) -> PipelineCfg {
    PipelineCfg {
        source: format!("{}/", dir.path().display()),
        figure: dir.path().join("confusion.svg"),
        report_json: Some(dir.path().join("report.json")),
        ..PipelineCfg::default()
    }
}

#[test]
fn five_row_tables_produce_two_evaluated_models() {
    let dir = TempDir::new().unwrap();
    write_tables(dir.path(), ACCIDENT, PERSON);

    let outcome = Pipeline::new(cfg_for(&dir)).unwrap().run().unwrap();

    let kinds: Vec<ModelKind> = outcome.results.iter().map(|r| r.model).collect();
    assert_eq!(
        kinds,
        vec![ModelKind::LogisticRegression, ModelKind::DecisionTree]
    );
    for result in &outcome.results {
        assert!((0.0..=1.0).contains(&result.accuracy));
        assert_eq!(result.confusion.total(), test_len(5, 0.2));
        assert_eq!(
            result.confusion.trace(),
            (result.accuracy * result.confusion.total() as f64).round() as usize
        );
    }

    assert!(outcome.report.contains("Logistic Regression Accuracy: "));
    assert!(outcome.report.contains("Decision Tree Accuracy: "));
    assert!(outcome.report.contains("weighted avg"));

    let figure = outcome.figure.expect("figure rendered");
    let svg = fs::read_to_string(figure).unwrap();
    assert!(svg.contains("Logistic Regression Confusion Matrix"));
    assert!(svg.contains("Decision Tree Confusion Matrix"));
    assert!(svg.contains("Predicted"));
    assert!(svg.contains("Actual"));

    let json_path = outcome.report_json.expect("json written");
    let json = fs::read_to_string(json_path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["results"].as_array().unwrap().len(), 2);
}

#[test]
fn repeated_runs_are_identical() {
    let dir = TempDir::new().unwrap();
    write_tables(dir.path(), ACCIDENT, PERSON);
    let pipeline = Pipeline::new(cfg_for(&dir)).unwrap();

    let first = pipeline.run().unwrap();
    let second = pipeline.run().unwrap();
    for (a, b) in first.results.iter().zip(&second.results) {
        assert_eq!(a.confusion, b.confusion);
        assert_eq!(a.accuracy, b.accuracy);
    }
    assert_eq!(first.report, second.report);
}

#[test]
fn unwritable_figure_does_not_fail_the_run() {
    let dir = TempDir::new().unwrap();
    write_tables(dir.path(), ACCIDENT, PERSON);
    let cfg = PipelineCfg {
        figure: dir.path().join("missing-dir").join("confusion.svg"),
        report_json: None,
        ..cfg_for(&dir)
    };

    let outcome = Pipeline::new(cfg).unwrap().run().unwrap();
    assert!(outcome.figure.is_none());
    assert_eq!(outcome.results.len(), 2);
}

#[test]
fn missing_dataset_is_a_load_error() {
    let dir = TempDir::new().unwrap();
    let accident = dir.path().join("accident.csv");
    fs::write(accident, ACCIDENT).unwrap();

    let err = Pipeline::new(cfg_for(&dir)).unwrap().run().unwrap_err();
    match err {
        CrashError::Load { dataset, .. } => assert_eq!(dataset, "person"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn absent_target_is_a_schema_error() {
    let dir = TempDir::new().unwrap();
    write_tables(dir.path(), ACCIDENT, PERSON);
    let cfg = PipelineCfg {
        target: "fatal".into(),
        ..cfg_for(&dir)
    };

    let err = Pipeline::new(cfg).unwrap().run().unwrap_err();
    assert!(matches!(err, CrashError::Schema(_)));
}

#[test]
fn all_missing_numeric_column_is_a_numeric_error() {
    let dir = TempDir::new().unwrap();
    let person = "caseid,age,severe_crash\n1,,0\n2,,1\n3,,1\n4,,1\n5,,0\n";
    write_tables(dir.path(), ACCIDENT, person);

    let err = Pipeline::new(cfg_for(&dir)).unwrap().run().unwrap_err();
    assert!(matches!(err, CrashError::Numeric(_)));
}
