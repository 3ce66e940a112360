//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use envcfg_content::RenderFormat;

/// envcfg - assemble, validate and render deployment configuration
#[derive(Parser, Debug)]
#[command(name = "envcfg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (logs go to stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Pipeline configuration file (default: ./envcfg.toml if present)
    #[arg(short, long, global = true, env = "ENVCFG_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Render an evaluated JSON document into a target format
    ///
    /// Examples:
    ///   envcfg render merged.json -f toml -o tracker.toml
    ///   envcfg render merged.json -o terraform.tfvars   # format from extension
    Render {
        /// Evaluated JSON document
        source: PathBuf,

        /// Output format: json, yaml, toml, hcl (tfvars), env (dotenv)
        #[arg(short, long)]
        format: Option<RenderFormat>,

        /// Destination file, replaced atomically
        #[arg(short, long)]
        output: PathBuf,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Build the source document from a flat wizard record
    Assemble {
        /// Wizard record (flat JSON object)
        input: PathBuf,

        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the full pipeline: assemble, validate, export, render, write
    Generate {
        /// Wizard record (flat JSON object)
        input: PathBuf,

        /// Output format; inferred from the output extension when omitted
        #[arg(short, long)]
        format: Option<RenderFormat>,

        /// Destination file
        #[arg(short, long)]
        output: PathBuf,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// List required external tools and whether they are installed
    CheckTools {
        /// Only tools needed for this format
        #[arg(short, long)]
        format: Option<RenderFormat>,
    },

    /// Print the resolved pipeline configuration as TOML
    Config,
}
