//! TOML renderer
//!
//! Every object is written in two passes: first its inline entries
//! (`key = value`) in insertion order, then its sub-tables and arrays of
//! tables in insertion order. A `[section]` header reopens a path, so any
//! inline key written after one would land in the wrong table.
//!
//! Value classification per key:
//!
//! | value                         | output                          |
//! |-------------------------------|---------------------------------|
//! | scalar / list of non-objects  | `key = value` / `key = [a, b]`  |
//! | object                        | `[dotted.path]` + its entries   |
//! | non-empty list of objects     | one `[[dotted.path]]` per item  |
//! | null                          | omitted (TOML has no null)      |

use super::escape::{float_literal, push_quoted, quoted};
use crate::error::{Error, Result};
use crate::format::{FormatRenderer, RenderFormat, require_object};
use crate::path::KeyPath;
use crate::value::{ConfigValue, Object};

/// Writes TOML documents with basic (double-quoted) strings
#[derive(Debug, Default)]
pub struct TomlRenderer;

impl TomlRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl FormatRenderer for TomlRenderer {
    fn format(&self) -> RenderFormat {
        RenderFormat::Toml
    }

    fn render(&self, root: &ConfigValue) -> Result<String> {
        let table = require_object(root, RenderFormat::Toml)?;

        let mut writer = TomlWriter::default();
        writer.write_table(None, table, &KeyPath::root(), false)?;
        Ok(writer.finish())
    }
}

/// How a single entry is emitted
enum EntryKind {
    Inline,
    Table,
    ArrayOfTables,
    Skip,
}

fn classify(value: &ConfigValue, path: &KeyPath) -> Result<EntryKind> {
    match value {
        ConfigValue::Null => Ok(EntryKind::Skip),
        ConfigValue::Object(_) => Ok(EntryKind::Table),
        ConfigValue::List(items)
            if !items.is_empty() && items.iter().all(|item| matches!(item, ConfigValue::Object(_))) =>
        {
            Ok(EntryKind::ArrayOfTables)
        }
        ConfigValue::List(items) => {
            check_inline_array(items, path)?;
            Ok(EntryKind::Inline)
        }
        _ => Ok(EntryKind::Inline),
    }
}

/// An inline array may hold scalars and nested arrays, never tables or nulls.
fn check_inline_array(items: &[ConfigValue], path: &KeyPath) -> Result<()> {
    for (i, item) in items.iter().enumerate() {
        match item {
            ConfigValue::Object(_) | ConfigValue::Null => {
                return Err(Error::HeterogeneousList { path: path.clone() });
            }
            ConfigValue::List(inner) => check_inline_array(inner, &path.index(i))?,
            _ => {}
        }
    }
    Ok(())
}

/// A `[table]` or `[[array]]` header
struct Header {
    keys: Vec<String>,
    array: bool,
}

impl Header {
    fn line(&self) -> String {
        let dotted = self
            .keys
            .iter()
            .map(|k| format_key(k))
            .collect::<Vec<_>>()
            .join(".");
        if self.array {
            format!("[[{dotted}]]")
        } else {
            format!("[{dotted}]")
        }
    }

    fn child(&self, key: &str, array: bool) -> Self {
        let mut keys = self.keys.clone();
        keys.push(key.to_string());
        Self { keys, array }
    }
}

#[derive(Default)]
struct TomlWriter {
    blocks: Vec<String>,
}

impl TomlWriter {
    fn write_table(
        &mut self,
        header: Option<Header>,
        table: &Object,
        path: &KeyPath,
        in_array: bool,
    ) -> Result<()> {
        let mut lines = Vec::new();
        let mut nested = Vec::new();

        // Pass 1: inline entries
        for (key, value) in table {
            let child = path.key(key);
            match classify(value, &child)? {
                EntryKind::Skip => {}
                EntryKind::Inline => {
                    lines.push(format!("{} = {}", format_key(key), inline_value(value)));
                }
                kind => nested.push((key, value, child, kind)),
            }
        }

        let header_line = header
            .as_ref()
            .filter(|h| h.array || !lines.is_empty())
            .map(Header::line);
        if let Some(line) = header_line {
            lines.insert(0, line);
        }
        if !lines.is_empty() {
            self.blocks.push(lines.join("\n"));
        }

        // Pass 2: sub-tables and arrays of tables
        let base = header.unwrap_or(Header {
            keys: Vec::new(),
            array: false,
        });
        for (key, value, child, kind) in nested {
            match (kind, value) {
                (EntryKind::Table, ConfigValue::Object(sub)) => {
                    self.write_table(Some(base.child(key, false)), sub, &child, in_array)?;
                }
                (EntryKind::ArrayOfTables, ConfigValue::List(items)) => {
                    if in_array {
                        return Err(Error::UnsupportedNesting { path: child });
                    }
                    for (i, item) in items.iter().enumerate() {
                        if let ConfigValue::Object(sub) = item {
                            self.write_table(
                                Some(base.child(key, true)),
                                sub,
                                &child.index(i),
                                true,
                            )?;
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }

    fn finish(self) -> String {
        if self.blocks.is_empty() {
            return String::new();
        }
        let mut out = self.blocks.join("\n\n");
        out.push('\n');
        out
    }
}

/// Bare key when possible, quoted otherwise.
fn format_key(key: &str) -> String {
    let bare = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare { key.to_string() } else { quoted(key) }
}

fn inline_value(value: &ConfigValue) -> String {
    let mut out = String::new();
    push_inline(&mut out, value);
    out
}

fn push_inline(out: &mut String, value: &ConfigValue) {
    match value {
        ConfigValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        ConfigValue::Int(i) => out.push_str(&i.to_string()),
        ConfigValue::Float(f) => out.push_str(&float_literal(*f)),
        ConfigValue::Text(s) => push_quoted(out, s),
        ConfigValue::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                push_inline(out, item);
            }
            out.push(']');
        }
        // Rejected by classification before any line is built
        ConfigValue::Null | ConfigValue::Object(_) => {}
    }
}
