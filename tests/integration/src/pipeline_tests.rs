//! End-to-end pipeline runs with a command-backed evaluator.
//!
//! A pass-through evaluator (`true` to validate, `cat {source}` to export)
//! stands in for the schema tool, so every run exercises real subprocesses,
//! real backups and real atomic writes.

#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use envcfg_content::{ConfigValue, RenderFormat};
use envcfg_core::{CommandEvaluator, Error, EvaluationError, Orchestrator, PipelineConfig, Step};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../test-fixtures/wizard")
        .join(name)
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

fn pass_through_config() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.evaluator.validate = argv(&["true"]);
    config.evaluator.export = argv(&["cat", "{source}"]);
    config.evaluator.timeout_secs = 10;
    config
}

fn backups_in(dir: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "bak"))
        .collect();
    found.sort();
    found
}

#[test]
fn every_format_from_one_record() {
    let temp = TempDir::new().unwrap();
    let orchestrator = Orchestrator::from_config(pass_through_config());

    for format in [RenderFormat::Json, RenderFormat::Yaml, RenderFormat::Toml, RenderFormat::Hcl] {
        let output = temp.path().join(format!("out.{}", format.extensions()[0]));
        let report = orchestrator
            .generate(&fixture("hetzner-mysql.json"), format, &output)
            .unwrap_or_else(|e| panic!("{format}: {e}"));
        assert_eq!(report.bytes, fs::metadata(&output).unwrap().len() as usize);
    }

    let json = fs::read_to_string(temp.path().join("out.json")).unwrap();
    let doc = ConfigValue::parse(&json).unwrap();
    assert_eq!(
        doc.pointer(&["provider", "server_type"]).and_then(|v| v.as_str()),
        Some("cx22")
    );

    let toml = fs::read_to_string(temp.path().join("out.toml")).unwrap();
    assert!(toml.contains("[[tracker.udp_trackers]]\nbind_address = \"0.0.0.0:6868\"\n"), "{toml}");

    let hcl = fs::read_to_string(temp.path().join("out.tfvars")).unwrap();
    assert!(hcl.contains("backup = { schedule = \"0 3 * * *\", retention_days = 7 }"), "{hcl}");
}

#[test]
fn nested_document_cannot_become_env() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join(".env");

    let err = Orchestrator::from_config(pass_through_config())
        .generate(&fixture("lxd-sqlite.json"), RenderFormat::Env, &output)
        .unwrap_err();

    assert_eq!(err.step, Step::Render);
    assert!(matches!(
        err.source,
        Error::Render(envcfg_content::Error::NestedObjectNotSupported { .. })
    ));
    assert!(!output.exists());
}

#[test]
fn rejected_record_keeps_destination_and_backup() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("tracker.toml");
    fs::write(&output, "[core]\nprivate = true\n").unwrap();

    let mut config = pass_through_config();
    config.evaluator.validate = argv(&[
        "sh",
        "-c",
        "echo 'tracker.core.database.port: must be a valid port' >&2; exit 1",
    ]);

    let err = Orchestrator::from_config(config)
        .generate(&fixture("hetzner-mysql.json"), RenderFormat::Toml, &output)
        .unwrap_err();

    assert_eq!(err.step, Step::Validate);
    match &err.source {
        Error::Evaluation(EvaluationError::Diagnostics(lines)) => {
            assert_eq!(lines, &vec!["tracker.core.database.port: must be a valid port".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(fs::read_to_string(&output).unwrap(), "[core]\nprivate = true\n");

    let backups = backups_in(temp.path());
    assert_eq!(backups.len(), 1);
    assert_eq!(err.backup.as_ref(), Some(&backups[0]));
    assert_eq!(fs::read_to_string(&backups[0]).unwrap(), "[core]\nprivate = true\n");
}

#[test]
fn backups_go_to_configured_directory() {
    let temp = TempDir::new().unwrap();
    let backup_dir = temp.path().join("backups");
    let output = temp.path().join("out.yaml");
    fs::write(&output, "old: true\n").unwrap();

    let mut config = pass_through_config();
    config.backup.dir = Some(backup_dir.clone());

    let report = Orchestrator::from_config(config)
        .generate(&fixture("lxd-sqlite.json"), RenderFormat::Yaml, &output)
        .unwrap();

    let backup = report.backup.unwrap();
    assert_eq!(backup.parent(), Some(backup_dir.as_path()));
    assert_eq!(fs::read_to_string(backup).unwrap(), "old: true\n");
    assert!(fs::read_to_string(&output).unwrap().starts_with("environment:\n"));
}

#[test]
fn post_processor_rewrites_output() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("out.tfvars");

    let mut config = pass_through_config();
    config.post_process.hcl = Some(argv(&["sed", "s/ = / = /"]));
    config.post_process.json = Some(argv(&["tr", "a-z", "A-Z"]));

    let orchestrator = Orchestrator::from_config(config);
    assert!(orchestrator.required_tools(RenderFormat::Json).contains(&"tr".to_string()));

    let json_out = temp.path().join("out.json");
    orchestrator
        .generate(&fixture("lxd-sqlite.json"), RenderFormat::Json, &json_out)
        .unwrap();
    assert!(fs::read_to_string(&json_out).unwrap().contains("\"ENVIRONMENT\""));

    orchestrator
        .generate(&fixture("lxd-sqlite.json"), RenderFormat::Hcl, &output)
        .unwrap();
    assert!(fs::read_to_string(&output).unwrap().starts_with("environment = {"));
}

#[test]
fn hung_evaluator_is_killed() {
    let temp = TempDir::new().unwrap();
    let mut config = pass_through_config();
    config.evaluator.validate = argv(&["sleep", "30"]);
    config.evaluator.timeout_secs = 1;

    let err = Orchestrator::from_config(config)
        .generate(&fixture("lxd-sqlite.json"), RenderFormat::Json, &temp.path().join("o.json"))
        .unwrap_err();

    assert_eq!(err.step, Step::Validate);
    assert!(matches!(
        err.source,
        Error::Evaluation(EvaluationError::Timeout { timeout, .. }) if timeout == Duration::from_secs(1)
    ));
}

#[test]
fn missing_evaluator_is_a_dependency_error() {
    let temp = TempDir::new().unwrap();
    let mut config = pass_through_config();
    config.evaluator.validate = argv(&["envcfg-no-such-validator"]);
    config.tools = argv(&["envcfg-no-such-helper"]);

    let err = Orchestrator::from_config(config)
        .generate(&fixture("lxd-sqlite.json"), RenderFormat::Json, &temp.path().join("o.json"))
        .unwrap_err();

    assert_eq!(err.step, Step::Dependencies);
    match err.source {
        Error::DependencyMissing { tools } => {
            assert_eq!(tools, argv(&["envcfg-no-such-helper", "envcfg-no-such-validator"]))
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn concurrent_runs_leave_one_complete_file() {
    let temp = TempDir::new().unwrap();
    let output = Arc::new(temp.path().join("shared.json"));
    let evaluator = Arc::new(CommandEvaluator::from_config(&pass_through_config().evaluator));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let output = Arc::clone(&output);
            let evaluator = Arc::clone(&evaluator);
            thread::spawn(move || {
                let mut config = pass_through_config();
                config.backup.enabled = false;
                Orchestrator::new(config, evaluator)
                    .generate(&fixture("lxd-sqlite.json"), RenderFormat::Json, &output)
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let text = fs::read_to_string(output.as_path()).unwrap();
    assert!(ConfigValue::parse(&text).is_ok());
    assert!(fs::read_dir(temp.path()).unwrap().count() == 1);
}
