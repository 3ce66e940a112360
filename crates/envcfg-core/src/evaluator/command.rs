//! Evaluator backed by external commands

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use super::{EvaluationError, Evaluator};
use crate::config::EvaluatorConfig;
use crate::process::CommandRunner;

const SOURCE_PLACEHOLDER: &str = "{source}";
const SCHEMA_PLACEHOLDER: &str = "{schema}";

/// Runs configured validate/export command lines
///
/// Arguments may contain `{source}` (the assembled document) and `{schema}`
/// (the configured schema path). An argument that is exactly `{schema}` is
/// dropped when no schema is configured.
#[derive(Debug, Clone)]
pub struct CommandEvaluator {
    validate: Vec<String>,
    export: Vec<String>,
    schema: Option<PathBuf>,
    runner: CommandRunner,
}

impl CommandEvaluator {
    pub fn new(validate: Vec<String>, export: Vec<String>) -> Self {
        Self {
            validate,
            export,
            schema: None,
            runner: CommandRunner::default(),
        }
    }

    pub fn from_config(config: &EvaluatorConfig) -> Self {
        let timeout = (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs));
        Self {
            validate: config.validate.clone(),
            export: config.export.clone(),
            schema: config.schema.clone(),
            runner: CommandRunner::new(timeout),
        }
    }

    pub fn with_schema(mut self, schema: impl Into<PathBuf>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_runner(mut self, runner: CommandRunner) -> Self {
        self.runner = runner;
        self
    }

    /// Substitute placeholders in a command template.
    pub fn expand(&self, template: &[String], source: &Path) -> Vec<String> {
        let source = source.to_string_lossy();
        let schema = self
            .schema
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());

        template
            .iter()
            .filter(|arg| schema.is_some() || arg.as_str() != SCHEMA_PLACEHOLDER)
            .map(|arg| {
                arg.replace(SOURCE_PLACEHOLDER, &source)
                    .replace(SCHEMA_PLACEHOLDER, schema.as_deref().unwrap_or(""))
            })
            .collect()
    }
}

impl Evaluator for CommandEvaluator {
    fn validate(&self, source: &Path) -> Result<(), EvaluationError> {
        let argv = self.expand(&self.validate, source);
        let output = self.runner.run(&argv, None)?;
        if output.success() {
            debug!(source = %source.display(), "Validation passed");
            return Ok(());
        }

        let mut diagnostics = diagnostic_lines(&output.stderr);
        if diagnostics.is_empty() {
            diagnostics = diagnostic_lines(&output.stdout);
        }
        if diagnostics.is_empty() {
            diagnostics.push(format!(
                "{} exited with code {}",
                argv[0],
                output.code.map_or_else(|| "none".to_string(), |c| c.to_string())
            ));
        }
        Err(EvaluationError::Diagnostics(diagnostics))
    }

    fn export_json(&self, source: &Path) -> Result<String, EvaluationError> {
        let argv = self.expand(&self.export, source);
        let stdout = self.runner.run_checked(&argv, None)?;
        if stdout.trim().is_empty() {
            return Err(EvaluationError::InvalidOutput {
                program: argv[0].clone(),
                message: "export produced no output".to_string(),
            });
        }
        Ok(stdout)
    }

    fn required_tools(&self) -> Vec<String> {
        let mut tools: Vec<String> = [&self.validate, &self.export]
            .into_iter()
            .filter_map(|argv| argv.first().cloned())
            .collect();
        tools.dedup();
        tools
    }

    fn name(&self) -> String {
        self.export
            .first()
            .cloned()
            .unwrap_or_else(|| "evaluator".to_string())
    }
}

fn diagnostic_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn expands_placeholders() {
        let evaluator = CommandEvaluator::new(
            strings(&["cue", "vet", "-c", "{schema}", "{source}"]),
            strings(&["cue", "export", "{schema}", "{source}", "--out", "json"]),
        )
        .with_schema("schema/deploy.cue");

        assert_eq!(
            evaluator.expand(&evaluator.validate, Path::new("/tmp/src.json")),
            strings(&["cue", "vet", "-c", "schema/deploy.cue", "/tmp/src.json"])
        );
    }

    #[test]
    fn bare_schema_argument_dropped_without_schema() {
        let evaluator = CommandEvaluator::new(strings(&["cue", "vet", "{schema}", "--in={source}"]), Vec::new());
        assert_eq!(
            evaluator.expand(&evaluator.validate, Path::new("a.json")),
            strings(&["cue", "vet", "--in=a.json"])
        );
    }

    #[test]
    fn required_tools_are_program_names() {
        let evaluator = CommandEvaluator::new(strings(&["cue", "vet"]), strings(&["cue", "export"]));
        assert_eq!(evaluator.required_tools(), strings(&["cue"]));

        let evaluator = CommandEvaluator::new(strings(&["check"]), strings(&["dump"]));
        assert_eq!(evaluator.required_tools(), strings(&["check", "dump"]));
    }

    #[test]
    fn named_after_export_program() {
        let evaluator = CommandEvaluator::new(strings(&["check"]), strings(&["dump", "--json"]));
        assert_eq!(evaluator.name(), "dump");
        assert_eq!(CommandEvaluator::new(Vec::new(), Vec::new()).name(), "evaluator");
    }

    #[test]
    fn diagnostics_skip_blank_lines() {
        assert_eq!(
            diagnostic_lines("first  \n\n   \nsecond\n"),
            strings(&["first", "second"])
        );
    }

    #[cfg(unix)]
    #[test]
    fn failed_validation_returns_stderr_lines() {
        let evaluator = CommandEvaluator::new(
            strings(&["sh", "-c", "echo 'tracker.core.private: conflicting values' >&2; exit 1"]),
            Vec::new(),
        );
        let err = evaluator.validate(Path::new("unused.json")).unwrap_err();
        match err {
            EvaluationError::Diagnostics(lines) => {
                assert_eq!(lines, strings(&["tracker.core.private: conflicting values"]))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn silent_failure_still_reports_a_diagnostic() {
        let evaluator = CommandEvaluator::new(strings(&["false"]), Vec::new());
        let err = evaluator.validate(Path::new("unused.json")).unwrap_err();
        match err {
            EvaluationError::Diagnostics(lines) => assert_eq!(lines, strings(&["false exited with code 1"])),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn export_returns_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.json");
        std::fs::write(&source, "{\"a\": 1}").unwrap();

        let evaluator = CommandEvaluator::new(strings(&["true"]), strings(&["cat", "{source}"]));
        assert_eq!(evaluator.export_json(&source).unwrap(), "{\"a\": 1}");
    }

    #[cfg(unix)]
    #[test]
    fn empty_export_is_invalid_output() {
        let evaluator = CommandEvaluator::new(strings(&["true"]), strings(&["true"]));
        let err = evaluator.export_json(Path::new("x.json")).unwrap_err();
        assert!(matches!(err, EvaluationError::InvalidOutput { .. }));
    }
}
