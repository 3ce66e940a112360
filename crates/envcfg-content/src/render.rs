//! Format-agnostic rendering entry point

use crate::error::{Error, Result};
use crate::format::{FormatRenderer, RenderFormat};
use crate::handlers::{EnvRenderer, HclRenderer, JsonRenderer, TomlRenderer, YamlRenderer};
use crate::value::ConfigValue;

/// Knobs that do not change a format's structure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Single-line JSON instead of pretty-printed
    pub compact_json: bool,
}

/// Pick the renderer for `format`.
pub fn renderer_for(format: RenderFormat, options: RenderOptions) -> Box<dyn FormatRenderer> {
    match format {
        RenderFormat::Json if options.compact_json => Box::new(JsonRenderer::compact()),
        RenderFormat::Json => Box::new(JsonRenderer::new()),
        RenderFormat::Yaml => Box::new(YamlRenderer::new()),
        RenderFormat::Toml => Box::new(TomlRenderer::new()),
        RenderFormat::Hcl => Box::new(HclRenderer::new()),
        RenderFormat::Env => Box::new(EnvRenderer::new()),
    }
}

/// Render `root` as `format` with default options.
///
/// Every format but JSON requires an object root and fails with
/// [`Error::RootMustBeObject`] otherwise.
pub fn render(root: &ConfigValue, format: RenderFormat) -> Result<String> {
    render_with(root, format, RenderOptions::default())
}

/// Render `root` as `format`.
pub fn render_with(root: &ConfigValue, format: RenderFormat, options: RenderOptions) -> Result<String> {
    if format.requires_object_root() && root.as_object().is_none() {
        return Err(Error::RootMustBeObject { format });
    }
    renderer_for(format, options).render(root)
}
