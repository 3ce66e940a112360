//! `envcfg assemble`: flat wizard record to source document

use std::path::Path;

use colored::Colorize;
use envcfg_content::{RenderFormat, render};

use crate::error::Result;

/// Assemble `input` and write the source document to `output` or stdout.
pub fn run_assemble(input: &Path, output: Option<&Path>) -> Result<()> {
    let record = envcfg_core::read_record(input)?;
    let document = envcfg_core::assemble(&record).map_err(envcfg_core::Error::from)?;
    let json = render(&document, RenderFormat::Json)?;

    match output {
        Some(path) => {
            envcfg_fs::io::write_text(path, &json)?;
            eprintln!(
                "{} Assembled {} fields into {}",
                "OK".green().bold(),
                record.len(),
                path.display().to_string().cyan()
            );
        }
        None => print!("{json}"),
    }
    Ok(())
}
