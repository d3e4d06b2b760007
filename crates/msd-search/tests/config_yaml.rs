use std::fs;
use std::time::Duration;

use msd_fold::EngineKind;
use msd_search::{OutputFormat, RunConfig, RunReport, RunSummary, SampleMode};
use tempfile::tempdir;

#[test]
fn empty_document_takes_defaults() {
    let config = RunConfig::from_yaml("{}").expect("parse");
    assert_eq!(config, RunConfig::default());
    assert_eq!(config.runs, 100);
    assert_eq!(config.stop, 100_000);
    assert_eq!(config.mode, SampleMode::SampleGlobal);
    assert_eq!(config.weight, 0.5);
    assert_eq!(config.timeout(), None);
}

#[test]
fn partial_document_overrides_fields() {
    let yaml = "runs: 3\nmode: sample_strelem\nengine: pseudoknot\noutput: csv\ntimeout_secs: 2\nseed_policy:\n  master_seed: 7\n";
    let config = RunConfig::from_yaml(yaml).expect("parse");
    assert_eq!(config.runs, 3);
    assert_eq!(config.mode, SampleMode::SampleStrelem);
    assert_eq!(config.engine, EngineKind::Pseudoknot);
    assert_eq!(config.output, OutputFormat::Csv);
    assert_eq!(config.timeout(), Some(Duration::from_secs(2)));
    assert_eq!(config.seed_policy.master_seed, 7);
    assert_eq!(config.stop, 100_000);
}

#[test]
fn yaml_round_trips_through_a_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("run.yaml");
    let config = RunConfig {
        runs: 4,
        mode: SampleMode::Random,
        weight: 0.25,
        progress: true,
        ..RunConfig::default()
    };
    fs::write(&path, config.to_yaml().expect("yaml")).expect("write");
    assert_eq!(RunConfig::load(&path).expect("load"), config);
}

#[test]
fn invalid_mode_in_yaml_is_a_serde_error() {
    let err = RunConfig::from_yaml("mode: sample_everything\n").expect_err("bad mode");
    assert_eq!(err.info().code, "config-parse");
}

#[test]
fn missing_file_reports_path() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("absent.yaml");
    let err = RunConfig::load(&path).expect_err("missing");
    assert_eq!(err.info().code, "config-read");
    assert!(err.info().context.contains_key("path"));
}

#[test]
fn report_round_trips_as_json() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("summary.json");
    let runs = vec![RunSummary {
        run: 0,
        final_score: -3.5,
        mutations: 5,
        accepted: 2,
        sequence: "GGGAAACCC".to_string(),
    }];
    let report = RunReport::new(&RunConfig::default(), runs);
    report.write(&path).expect("write");
    assert_eq!(RunReport::load(&path).expect("load"), report);
}
