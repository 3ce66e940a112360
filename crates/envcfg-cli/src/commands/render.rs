//! `envcfg render`: evaluated JSON to a target format

use std::path::Path;

use colored::Colorize;
use envcfg_content::{ConfigValue, RenderFormat, RenderOptions, render_with};

use crate::error::Result;

/// Render `source` as `format` into `output`.
///
/// The destination is replaced atomically; nothing is printed to stdout.
pub fn run_render(source: &Path, format: RenderFormat, output: &Path, compact: bool) -> Result<()> {
    if !source.is_file() {
        return Err(envcfg_core::Error::InputNotFound {
            path: source.to_path_buf(),
        }
        .into());
    }

    let json = envcfg_fs::io::read_text(source)?;
    let document = ConfigValue::parse(&json)?;
    let text = render_with(&document, format, RenderOptions { compact_json: compact })?;
    envcfg_fs::io::write_text(output, &text)?;

    tracing::debug!(source = %source.display(), %format, bytes = text.len(), "Rendered");
    eprintln!(
        "{} Rendered {} as {} to {}",
        "OK".green().bold(),
        source.display(),
        format,
        output.display().to_string().cyan()
    );
    Ok(())
}
