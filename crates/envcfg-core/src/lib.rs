//! Document assembly and the render pipeline for envcfg
//!
//! This crate sits between the collected wizard answers and the files the
//! deployment tooling reads:
//!
//! ```text
//! flat record --assemble--> source document --evaluator--> merged JSON
//!     --parse--> ConfigValue --render--> destination file
//! ```
//!
//! - **Assembler**: builds the nested source document from a flat record,
//!   choosing provider, database and feature variants by discriminant
//! - **Evaluator**: the external validate/export contract, with a
//!   command-backed implementation
//! - **Orchestrator**: runs the steps with backup-before-overwrite and
//!   atomic writes, tagging failures with the step that failed
//!
//! Rendering itself lives in `envcfg-content`; files and backups in
//! `envcfg-fs`.

pub mod assembler;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod pipeline;
pub mod postprocess;
pub mod process;
pub mod tools;

pub use assembler::{AssembleError, Assembler, FlatRecord, assemble};
pub use config::PipelineConfig;
pub use error::{Error, PipelineError, Result};
pub use evaluator::{CommandEvaluator, EvaluationError, Evaluator};
pub use pipeline::{Orchestrator, PipelineReport, Step, read_record};
pub use postprocess::{CommandPostProcessor, NoPostProcess, PostProcessor};
pub use process::{CommandOutput, CommandRunner};
pub use tools::{PathToolChecker, ToolChecker, check_tools};
