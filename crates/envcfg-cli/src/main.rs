//! envcfg CLI
//!
//! Turns collected deployment answers into validated configuration files.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use envcfg_core::PipelineConfig;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for data
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    execute_command(&cli)
}

fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Render {
            source,
            format,
            output,
            compact,
        } => {
            let format = commands::resolve_format(*format, output)?;
            commands::run_render(source, format, output, *compact)
        }
        Commands::Assemble { input, output } => commands::run_assemble(input, output.as_deref()),
        Commands::Generate {
            input,
            format,
            output,
            compact,
        } => {
            let format = commands::resolve_format(*format, output)?;
            commands::run_generate(load_config(cli)?, input, format, output, *compact)
        }
        Commands::CheckTools { format } => commands::run_check_tools(load_config(cli)?, *format),
        Commands::Config => commands::run_config(&load_config(cli)?),
    }
}

/// Defaults, then the config file, then `ENVCFG_*` variables.
fn load_config(cli: &Cli) -> Result<PipelineConfig> {
    let cwd = std::env::current_dir()?;
    let mut config = PipelineConfig::discover(cli.config.as_deref(), &cwd)?;
    config.apply_overrides(std::env::vars())?;
    tracing::debug!(?config, "Resolved configuration");
    Ok(config)
}
