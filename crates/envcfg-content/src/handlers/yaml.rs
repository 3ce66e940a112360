//! YAML renderer

use crate::error::{Error, Result};
use crate::format::{FormatRenderer, RenderFormat, require_object};
use crate::value::ConfigValue;

/// Writes block-style YAML.
///
/// Objects become mappings and lists become sequences; `serde_yaml` decides
/// when a string needs quoting (leading indicators, `: `, values that would
/// read back as bool/number/null).
#[derive(Debug, Default)]
pub struct YamlRenderer;

impl YamlRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl FormatRenderer for YamlRenderer {
    fn format(&self) -> RenderFormat {
        RenderFormat::Yaml
    }

    fn render(&self, root: &ConfigValue) -> Result<String> {
        require_object(root, RenderFormat::Yaml)?;
        serde_yaml::to_string(root).map_err(|e| Error::Serialize {
            format: RenderFormat::Yaml,
            message: e.to_string(),
        })
    }
}
