//! HCL variable-file (`.tfvars`) renderer
//!
//! Produces one `key = <expr>` assignment per top-level entry. Nested values
//! are written as inline expressions, never as blocks:
//!
//! ```text
//! environment = { name = "dev", instance_name = "vm-dev" }
//! udp_ports   = [6969, 6868]
//! ```

use super::escape::{float_literal, quoted};
use crate::error::{Error, Result};
use crate::format::{FormatRenderer, RenderFormat, require_object};
use crate::path::KeyPath;
use crate::value::ConfigValue;

/// Writes flat HCL assignment files
#[derive(Debug, Default)]
pub struct HclRenderer;

impl HclRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl FormatRenderer for HclRenderer {
    fn format(&self) -> RenderFormat {
        RenderFormat::Hcl
    }

    fn render(&self, root: &ConfigValue) -> Result<String> {
        let table = require_object(root, RenderFormat::Hcl)?;

        let mut out = String::new();
        for (key, value) in table {
            // Body attributes must be identifiers; only object keys may be quoted
            if !is_identifier(key) {
                return Err(Error::InvalidKey {
                    format: RenderFormat::Hcl,
                    path: KeyPath::root().key(key),
                });
            }
            out.push_str(key);
            out.push_str(" = ");
            push_expr(&mut out, value);
            out.push('\n');
        }
        Ok(out)
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Object keys: identifiers stay bare, anything else is quoted.
fn format_key(key: &str) -> String {
    if is_identifier(key) { key.to_string() } else { quoted(key) }
}

fn push_expr(out: &mut String, value: &ConfigValue) {
    match value {
        ConfigValue::Null => out.push_str("null"),
        ConfigValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        ConfigValue::Int(i) => out.push_str(&i.to_string()),
        // HCL numbers have no NaN or infinity
        ConfigValue::Float(f) if !f.is_finite() => out.push_str("null"),
        ConfigValue::Float(f) => out.push_str(&float_literal(*f)),
        ConfigValue::Text(s) => out.push_str(&quote_template_safe(s)),
        ConfigValue::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                push_expr(out, item);
            }
            out.push(']');
        }
        ConfigValue::Object(map) if map.is_empty() => out.push_str("{}"),
        ConfigValue::Object(map) => {
            out.push_str("{ ");
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&format_key(key));
                out.push_str(" = ");
                push_expr(out, item);
            }
            out.push_str(" }");
        }
    }
}

/// Quote a string so HCL reads it back literally.
///
/// Besides the basic escapes, `${` and `%{` open template sequences in HCL
/// strings; they are doubled to `$${` and `%%{`.
fn quote_template_safe(s: &str) -> String {
    quoted(s).replace("${", "$${").replace("%{", "%%{")
}
