//! Command implementations for envcfg-cli
//!
//! Status lines go to stderr; stdout carries only requested data
//! (an assembled document, a tool list, a configuration).

pub mod assemble;
pub mod config;
pub mod generate;
pub mod render;
pub mod tools;

use std::path::Path;

use envcfg_content::RenderFormat;

use crate::error::{CliError, Result};

pub use assemble::run_assemble;
pub use config::run_config;
pub use generate::run_generate;
pub use render::run_render;
pub use tools::run_check_tools;

/// The explicit format, or the one implied by the output file name.
pub fn resolve_format(explicit: Option<RenderFormat>, output: &Path) -> Result<RenderFormat> {
    if let Some(format) = explicit {
        return Ok(format);
    }
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if name == ".env" || name.starts_with(".env.") {
        return Ok(RenderFormat::Env);
    }
    output
        .extension()
        .and_then(|ext| RenderFormat::from_extension(&ext.to_string_lossy()))
        .ok_or_else(|| {
            CliError::user(format!(
                "Cannot infer a format from '{}'; pass --format",
                output.display()
            ))
        })
}
