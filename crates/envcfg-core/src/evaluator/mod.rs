//! The evaluator contract
//!
//! The evaluator merges an assembled source document with schema defaults,
//! runs the schema's validators, and exports the final tree as JSON. It is
//! an external program; the pipeline only sees it through [`Evaluator`].

mod command;

pub use command::CommandEvaluator;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Errors raised while validating or exporting a document
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    /// Validation rejected the document
    #[error("Validation failed:\n{}", .0.join("\n"))]
    Diagnostics(Vec<String>),

    /// Tool exited with a non-zero status
    #[error("`{program}` failed (exit code {code}): {stderr}")]
    CommandFailed {
        program: String,
        code: i32,
        stderr: String,
    },

    /// Tool could not be started
    #[error("Failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Tool was killed after exceeding its deadline
    #[error("`{program}` timed out after {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    /// Pipe I/O with a running tool failed
    #[error("I/O error talking to `{program}`: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Tool succeeded but its output is unusable
    #[error("Unusable output from `{program}`: {message}")]
    InvalidOutput { program: String, message: String },
}

/// Validate and export source documents
pub trait Evaluator: Send + Sync {
    /// Check the document at `source`; diagnostics come back as
    /// [`EvaluationError::Diagnostics`].
    fn validate(&self, source: &Path) -> Result<(), EvaluationError>;

    /// Export the merged document at `source` as JSON text.
    fn export_json(&self, source: &Path) -> Result<String, EvaluationError>;

    /// External programs this evaluator needs on `PATH`.
    fn required_tools(&self) -> Vec<String> {
        Vec::new()
    }

    /// Name used when reporting unusable output.
    fn name(&self) -> String {
        "evaluator".to_string()
    }
}

impl<E: Evaluator + ?Sized> Evaluator for Arc<E> {
    fn validate(&self, source: &Path) -> Result<(), EvaluationError> {
        (**self).validate(source)
    }

    fn export_json(&self, source: &Path) -> Result<String, EvaluationError> {
        (**self).export_json(source)
    }

    fn required_tools(&self) -> Vec<String> {
        (**self).required_tools()
    }

    fn name(&self) -> String {
        (**self).name()
    }
}
