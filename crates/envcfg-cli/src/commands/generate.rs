//! `envcfg generate`: the full pipeline

use std::path::Path;

use colored::Colorize;
use envcfg_content::{RenderFormat, RenderOptions};
use envcfg_core::{Orchestrator, PipelineConfig};

use crate::error::Result;

/// Run every pipeline step for `input`, writing `output`.
pub fn run_generate(
    config: PipelineConfig,
    input: &Path,
    format: RenderFormat,
    output: &Path,
    compact: bool,
) -> Result<()> {
    eprintln!(
        "{} Generating {} configuration from {}",
        "=>".blue().bold(),
        format,
        input.display()
    );

    let orchestrator = Orchestrator::from_config(config)
        .with_render_options(RenderOptions { compact_json: compact });
    let report = orchestrator.generate(input, format, output)?;

    if let Some(backup) = &report.backup {
        eprintln!(
            "   {} previous content saved to {}",
            "+".green(),
            backup.display()
        );
    }
    eprintln!(
        "{} Wrote {} bytes to {}",
        "OK".green().bold(),
        report.bytes,
        report.output.display().to_string().cyan()
    );
    Ok(())
}
