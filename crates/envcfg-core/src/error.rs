//! Error types for envcfg-core

use std::path::PathBuf;

use envcfg_content::RenderFormat;

use crate::assembler::AssembleError;
use crate::evaluator::EvaluationError;

/// Result type for envcfg-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while assembling, evaluating, or rendering
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input file does not exist
    #[error("Input not found: {path}")]
    InputNotFound { path: PathBuf },

    /// One or more required external tools are not installed
    #[error("Missing required tools: {}", .tools.join(", "))]
    DependencyMissing {
        /// Every missing tool, sorted and de-duplicated
        tools: Vec<String>,
    },

    /// Pipeline configuration could not be loaded
    #[error("Invalid configuration at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// An external formatter rejected the rendered text
    #[error("Post-processing {format} output failed: {source}")]
    PostProcess {
        format: RenderFormat,
        #[source]
        source: EvaluationError,
    },

    /// Evaluator rejected the document or could not be run
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    /// Flat record could not be turned into a source document
    #[error(transparent)]
    Assembly(#[from] AssembleError),

    /// Value parsing or rendering error from envcfg-content
    #[error(transparent)]
    Render(#[from] envcfg_content::Error),

    /// Filesystem error from envcfg-fs
    #[error(transparent)]
    Fs(#[from] envcfg_fs::Error),
}

/// A failed pipeline run, tagged with the step that failed
#[derive(Debug, thiserror::Error)]
#[error("{step} step failed: {source}{}", backup_hint(.backup))]
pub struct PipelineError {
    /// Step that failed
    pub step: crate::pipeline::Step,
    /// Underlying failure
    #[source]
    pub source: Error,
    /// Backup of the destination taken before the failure, if any
    pub backup: Option<PathBuf>,
}

impl PipelineError {
    pub fn new(step: crate::pipeline::Step, source: impl Into<Error>) -> Self {
        Self {
            step,
            source: source.into(),
            backup: None,
        }
    }
}

fn backup_hint(backup: &Option<PathBuf>) -> String {
    match backup {
        Some(path) => format!(" (previous content kept at {})", path.display()),
        None => String::new(),
    }
}
