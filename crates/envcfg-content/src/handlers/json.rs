//! JSON renderer

use crate::error::{Error, Result};
use crate::format::{FormatRenderer, RenderFormat};
use crate::value::ConfigValue;

/// Re-serializes a document as JSON.
///
/// Accepts any root. Non-finite floats have no JSON form and are written as
/// `null`.
#[derive(Debug, Default)]
pub struct JsonRenderer {
    compact: bool,
}

impl JsonRenderer {
    /// Pretty-printing renderer (two-space indent)
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-line renderer
    pub fn compact() -> Self {
        Self { compact: true }
    }
}

impl FormatRenderer for JsonRenderer {
    fn format(&self) -> RenderFormat {
        RenderFormat::Json
    }

    fn render(&self, root: &ConfigValue) -> Result<String> {
        let text = if self.compact {
            serde_json::to_string(root)
        } else {
            serde_json::to_string_pretty(root)
        }
        .map_err(|e| Error::Serialize {
            format: RenderFormat::Json,
            message: e.to_string(),
        })?;

        Ok(text + "\n")
    }
}
