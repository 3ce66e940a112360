//! `.env` renderer
//!
//! Lines are sorted by key so regenerated files diff stably no matter how
//! the document was assembled.

use crate::error::{Error, Result};
use crate::format::{FormatRenderer, RenderFormat, require_object};
use crate::path::KeyPath;
use crate::value::ConfigValue;

/// Characters that force a value into double quotes
const QUOTE_TRIGGERS: &[char] = &[' ', '=', '"', '#', '\t', '\n', '\r'];

/// Writes `KEY=VALUE` lines
#[derive(Debug, Default)]
pub struct EnvRenderer;

impl EnvRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl FormatRenderer for EnvRenderer {
    fn format(&self) -> RenderFormat {
        RenderFormat::Env
    }

    fn render(&self, root: &ConfigValue) -> Result<String> {
        let table = require_object(root, RenderFormat::Env)?;

        let mut entries: Vec<_> = table.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        let mut out = String::new();
        for (key, value) in entries {
            let path = KeyPath::root().key(key);
            if !is_variable_name(key) {
                return Err(Error::InvalidKey {
                    format: RenderFormat::Env,
                    path,
                });
            }
            if let Some(text) = flat_value(value, &path)? {
                out.push_str(key);
                out.push('=');
                out.push_str(&quote_if_needed(&text));
                out.push('\n');
            }
        }
        Ok(out)
    }
}

/// `[A-Za-z_][A-Za-z0-9_.]*`, the names shells and dotenv loaders accept
fn is_variable_name(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// The unquoted text of a top-level value, or `None` to omit the line.
fn flat_value(value: &ConfigValue, path: &KeyPath) -> Result<Option<String>> {
    match value {
        ConfigValue::Object(map) if map.is_empty() => Ok(None),
        ConfigValue::Object(_) => Err(Error::NestedObjectNotSupported { path: path.clone() }),
        ConfigValue::List(items) => {
            let parts = items
                .iter()
                .enumerate()
                .map(|(i, item)| scalar_text(item, &path.index(i)))
                .collect::<Result<Vec<_>>>()?;
            Ok(Some(parts.join(",")))
        }
        scalar => scalar_text(scalar, path).map(Some),
    }
}

fn scalar_text(value: &ConfigValue, path: &KeyPath) -> Result<String> {
    match value {
        ConfigValue::Null => Ok(String::new()),
        ConfigValue::Bool(b) => Ok(b.to_string()),
        ConfigValue::Int(i) => Ok(i.to_string()),
        ConfigValue::Float(f) => Ok(format!("{f:?}")),
        ConfigValue::Text(s) => Ok(s.clone()),
        ConfigValue::List(_) | ConfigValue::Object(_) => {
            Err(Error::NestedObjectNotSupported { path: path.clone() })
        }
    }
}

fn quote_if_needed(text: &str) -> String {
    if !text.contains(QUOTE_TRIGGERS) {
        return text.to_string();
    }
    let escaped = text
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r");
    format!("\"{escaped}\"")
}
