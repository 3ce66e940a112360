//! Wizard-to-file pipeline
//!
//! [`Orchestrator::run`] executes the steps in order:
//!
//! 1. check that every required external tool is installed
//! 2. back up the destination if it has content
//! 3. assemble the source document from the flat record
//! 4. validate it with the evaluator
//! 5. export the merged document as JSON and parse it
//! 6. render it (and post-process the text if configured)
//! 7. write it atomically
//!
//! A failure after the backup restores it. Every failure is reported as a
//! [`PipelineError`] naming its [`Step`].

use std::fmt;
use std::path::{Path, PathBuf};

use envcfg_content::{ConfigValue, RenderFormat, RenderOptions};
use envcfg_fs::{Backup, BackupStore};
use tracing::{debug, info, warn};

use crate::assembler::{Assembler, FlatRecord};
use crate::config::PipelineConfig;
use crate::error::{Error, PipelineError, Result};
use crate::evaluator::{CommandEvaluator, EvaluationError, Evaluator};
use crate::postprocess::{CommandPostProcessor, PostProcessor};
use crate::tools::{PathToolChecker, ToolChecker, check_tools};

/// File name of the assembled document handed to the evaluator
const SOURCE_FILE: &str = "source.json";

/// Named pipeline step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Dependencies,
    Backup,
    Assemble,
    Validate,
    Export,
    Render,
    Write,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Dependencies => "dependencies",
            Self::Backup => "backup",
            Self::Assemble => "assemble",
            Self::Validate => "validate",
            Self::Export => "export",
            Self::Render => "render",
            Self::Write => "write",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub output: PathBuf,
    pub format: RenderFormat,
    /// Backup of the previous destination content
    pub backup: Option<PathBuf>,
    /// Bytes written
    pub bytes: usize,
}

/// Runs the pipeline against one evaluator
pub struct Orchestrator {
    config: PipelineConfig,
    evaluator: Box<dyn Evaluator>,
    tools: Box<dyn ToolChecker>,
    post_processor: Box<dyn PostProcessor>,
    assembler: Assembler,
    backups: BackupStore,
    options: RenderOptions,
}

impl Orchestrator {
    /// Orchestrator with a caller-supplied evaluator.
    ///
    /// Tools are looked up on `PATH` and post-processing follows
    /// `config.post_process`; both can be replaced with the `with_*` methods.
    pub fn new(config: PipelineConfig, evaluator: impl Evaluator + 'static) -> Self {
        let backups = match &config.backup.dir {
            Some(dir) => BackupStore::in_dir(dir),
            None => BackupStore::new(),
        };
        Self {
            post_processor: Box::new(CommandPostProcessor::from_config(&config)),
            evaluator: Box::new(evaluator),
            tools: Box::new(PathToolChecker::from_env()),
            assembler: Assembler::default(),
            backups,
            options: RenderOptions::default(),
            config,
        }
    }

    /// Orchestrator whose evaluator runs the commands in `config.evaluator`.
    pub fn from_config(config: PipelineConfig) -> Self {
        let evaluator = CommandEvaluator::from_config(&config.evaluator);
        Self::new(config, evaluator)
    }

    pub fn with_tool_checker(mut self, checker: impl ToolChecker + 'static) -> Self {
        self.tools = Box::new(checker);
        self
    }

    pub fn with_post_processor(mut self, post_processor: impl PostProcessor + 'static) -> Self {
        self.post_processor = Box::new(post_processor);
        self
    }

    pub fn with_assembler(mut self, assembler: Assembler) -> Self {
        self.assembler = assembler;
        self
    }

    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Every external program a run producing `format` needs, sorted.
    pub fn required_tools(&self, format: RenderFormat) -> Vec<String> {
        let mut tools = self.evaluator.required_tools();
        tools.extend(self.config.tools.iter().cloned());
        tools.extend(self.post_processor.required_tools(format));
        tools.sort();
        tools.dedup();
        tools
    }

    /// `(tool, available)` for each required tool.
    pub fn tool_status(&self, format: RenderFormat) -> Vec<(String, bool)> {
        self.required_tools(format)
            .into_iter()
            .map(|tool| {
                let available = self.tools.is_available(&tool);
                (tool, available)
            })
            .collect()
    }

    /// Run the pipeline for the wizard record stored at `input`.
    pub fn generate(
        &self,
        input: &Path,
        format: RenderFormat,
        output: &Path,
    ) -> std::result::Result<PipelineReport, PipelineError> {
        let record = read_record(input).map_err(|e| PipelineError::new(Step::Assemble, e))?;
        self.run(&record, format, output)
    }

    /// Run the pipeline for an in-memory record.
    pub fn run(
        &self,
        record: &FlatRecord,
        format: RenderFormat,
        output: &Path,
    ) -> std::result::Result<PipelineReport, PipelineError> {
        debug!(step = %Step::Dependencies, "Checking required tools");
        check_tools(&*self.tools, &self.required_tools(format))
            .map_err(|e| PipelineError::new(Step::Dependencies, e))?;

        let backup = self
            .take_backup(output)
            .map_err(|e| PipelineError::new(Step::Backup, e))?;

        match self.produce(record, format, output) {
            Ok(bytes) => {
                info!(output = %output.display(), %format, bytes, "Wrote configuration");
                Ok(PipelineReport {
                    output: output.to_path_buf(),
                    format,
                    backup: backup.map(|b| b.path),
                    bytes,
                })
            }
            Err((step, source)) => {
                if let Some(backup) = &backup {
                    self.restore(backup);
                }
                Err(PipelineError {
                    step,
                    source,
                    backup: backup.map(|b| b.path),
                })
            }
        }
    }

    fn take_backup(&self, output: &Path) -> Result<Option<Backup>> {
        if !self.config.backup.enabled {
            debug!(step = %Step::Backup, "Backups disabled");
            return Ok(None);
        }
        debug!(step = %Step::Backup, output = %output.display(), "Backing up destination");
        Ok(self.backups.create(output)?)
    }

    fn restore(&self, backup: &Backup) {
        match self.backups.restore(backup) {
            Ok(true) => warn!(output = %backup.original.display(), "Restored destination from backup"),
            Ok(false) => debug!("Destination unchanged, backup retained"),
            Err(e) => warn!(
                backup = %backup.path.display(),
                error = %e,
                "Failed to restore destination from backup"
            ),
        }
    }

    /// Steps 3 to 7. Returns the number of bytes written.
    fn produce(
        &self,
        record: &FlatRecord,
        format: RenderFormat,
        output: &Path,
    ) -> std::result::Result<usize, (Step, Error)> {
        debug!(step = %Step::Assemble, "Assembling source document");
        let scratch = tempfile::Builder::new()
            .prefix("envcfg-")
            .tempdir()
            .map_err(|e| (Step::Assemble, Error::Fs(envcfg_fs::Error::io(std::env::temp_dir(), e))))?;
        let source_path = scratch.path().join(SOURCE_FILE);
        self.write_source(record, &source_path).map_err(at(Step::Assemble))?;

        debug!(step = %Step::Validate, source = %source_path.display(), "Validating");
        self.evaluator
            .validate(&source_path)
            .map_err(|e| (Step::Validate, Error::Evaluation(e)))?;

        debug!(step = %Step::Export, "Exporting merged document");
        let json = self
            .evaluator
            .export_json(&source_path)
            .map_err(|e| (Step::Export, Error::Evaluation(e)))?;
        let document = ConfigValue::parse(&json).map_err(|e| {
            let invalid = EvaluationError::InvalidOutput {
                program: self.evaluator.name(),
                message: e.to_string(),
            };
            (Step::Export, Error::Evaluation(invalid))
        })?;

        debug!(step = %Step::Render, %format, "Rendering");
        let text = self.render(&document, format).map_err(at(Step::Render))?;

        debug!(step = %Step::Write, output = %output.display(), "Writing destination");
        envcfg_fs::io::write_text(output, &text).map_err(|e| (Step::Write, Error::Fs(e)))?;

        Ok(text.len())
    }

    fn write_source(&self, record: &FlatRecord, path: &Path) -> Result<()> {
        let source = self.assembler.assemble(record)?;
        let json = envcfg_content::render(&source, RenderFormat::Json)?;
        envcfg_fs::io::write_text(path, &json)?;
        Ok(())
    }

    fn render(&self, document: &ConfigValue, format: RenderFormat) -> Result<String> {
        let text = envcfg_content::render_with(document, format, self.options)?;
        self.post_processor
            .process(format, text)
            .map_err(|source| Error::PostProcess { format, source })
    }
}

fn at(step: Step) -> impl Fn(Error) -> (Step, Error) {
    move |e| (step, e)
}

/// Read and parse a wizard record file.
pub fn read_record(path: &Path) -> Result<FlatRecord> {
    if !path.is_file() {
        return Err(Error::InputNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = envcfg_fs::io::read_text(path)?;
    Ok(FlatRecord::from_json(&text)?)
}
