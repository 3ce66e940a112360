//! `envcfg check-tools`

use colored::Colorize;
use envcfg_content::RenderFormat;
use envcfg_core::{Orchestrator, PipelineConfig};

use crate::error::Result;

/// Print each required tool with its availability.
///
/// Fails with the full list of missing tools if any is absent.
pub fn run_check_tools(config: PipelineConfig, format: Option<RenderFormat>) -> Result<()> {
    let orchestrator = Orchestrator::from_config(config);
    let formats: Vec<RenderFormat> = match format {
        Some(format) => vec![format],
        None => RenderFormat::ALL.to_vec(),
    };

    let mut status: Vec<(String, bool)> = formats
        .into_iter()
        .flat_map(|format| orchestrator.tool_status(format))
        .collect();
    status.sort();
    status.dedup();

    println!("{}", "Required tools".bold());
    for (tool, available) in &status {
        if *available {
            println!("  {} {}", "+".green(), tool);
        } else {
            println!("  {} {} {}", "x".red(), tool, "(not found)".dimmed());
        }
    }

    let missing: Vec<String> = status
        .into_iter()
        .filter(|(_, available)| !available)
        .map(|(tool, _)| tool)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(envcfg_core::Error::DependencyMissing { tools: missing }.into())
    }
}
