//! Flat wizard records and their value coercions

use envcfg_content::{ConfigValue, Object};

use super::AssembleError;

/// One flat `name -> scalar` record as collected by the front end
///
/// Front ends tend to hand everything back as text, so the typed accessors
/// accept both native JSON values and their textual spellings. Null and
/// blank text count as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRecord {
    values: Object,
}

impl FlatRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object of scalars (lists of scalars are allowed too).
    pub fn from_json(text: &str) -> Result<Self, AssembleError> {
        let value = ConfigValue::parse(text).map_err(|e| AssembleError::Parse {
            message: e.to_string(),
        })?;
        let ConfigValue::Object(values) = value else {
            return Err(AssembleError::Parse {
                message: format!("expected a JSON object, found {}", value.kind()),
            });
        };
        if let Some((key, _)) = values.iter().find(|(_, v)| matches!(v, ConfigValue::Object(_))) {
            return Err(AssembleError::Parse {
                message: format!("field '{key}' is nested; records must be flat"),
            });
        }
        Ok(Self { values })
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The raw value for `key`, skipping nulls and blank text.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        match self.values.get(key)? {
            ConfigValue::Null => None,
            ConfigValue::Text(s) if s.trim().is_empty() => None,
            value => Some(value),
        }
    }

    /// Discriminant value: trimmed, lower-cased text of a scalar.
    ///
    /// A list can never select a variant, so it is an unknown one.
    pub fn discriminant(&self, key: &str) -> Result<Option<String>, AssembleError> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        match scalar_text(value) {
            Some(text) => Ok(Some(text.trim().to_ascii_lowercase())),
            None => Err(AssembleError::UnknownVariant {
                discriminant: key.to_string(),
                value: compact_json(value),
            }),
        }
    }

    /// Any scalar as text.
    pub fn text(&self, key: &str) -> Result<Option<String>, AssembleError> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        scalar_text(value)
            .map(Some)
            .ok_or_else(|| invalid(key, value, "a scalar"))
    }

    /// An integer, or text holding one.
    pub fn int(&self, key: &str) -> Result<Option<i64>, AssembleError> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        match value {
            ConfigValue::Int(i) => Ok(Some(*i)),
            ConfigValue::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(Some(*f as i64)),
            ConfigValue::Text(s) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| invalid(key, value, "an integer")),
            _ => Err(invalid(key, value, "an integer")),
        }
    }

    /// A boolean, or one of `true/false/yes/no/1/0`.
    pub fn bool(&self, key: &str) -> Result<Option<bool>, AssembleError> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        match value {
            ConfigValue::Bool(b) => Ok(Some(*b)),
            ConfigValue::Int(0) => Ok(Some(false)),
            ConfigValue::Int(1) => Ok(Some(true)),
            ConfigValue::Text(s) => parse_flag(s)
                .map(Some)
                .ok_or_else(|| invalid(key, value, "a boolean")),
            _ => Err(invalid(key, value, "a boolean")),
        }
    }

    /// A list of strings, given either as a JSON list or comma-separated text.
    pub fn list(&self, key: &str) -> Result<Option<Vec<String>>, AssembleError> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let items: Vec<String> = match value {
            ConfigValue::List(items) => items
                .iter()
                .map(|item| scalar_text(item).ok_or_else(|| invalid(key, value, "a list of scalars")))
                .collect::<Result<_, _>>()?,
            ConfigValue::Text(s) => s.split(',').map(|part| part.trim().to_string()).collect(),
            other => vec![scalar_text(other).ok_or_else(|| invalid(key, value, "a list"))?],
        };
        Ok(Some(items.into_iter().filter(|s| !s.is_empty()).collect()))
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> FromIterator<(K, V)> for FlatRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

/// Parse a yes/no style flag.
pub(crate) fn parse_flag(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "on" | "1" => Some(true),
        "false" | "no" | "n" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn scalar_text(value: &ConfigValue) -> Option<String> {
    match value {
        ConfigValue::Bool(b) => Some(b.to_string()),
        ConfigValue::Int(i) => Some(i.to_string()),
        ConfigValue::Float(f) => Some(f.to_string()),
        ConfigValue::Text(s) => Some(s.clone()),
        ConfigValue::Null | ConfigValue::List(_) | ConfigValue::Object(_) => None,
    }
}

fn invalid(key: &str, value: &ConfigValue, expected: &'static str) -> AssembleError {
    let value = match value {
        ConfigValue::Text(s) => s.clone(),
        other => compact_json(other),
    };
    AssembleError::InvalidField {
        key: key.to_string(),
        value,
        expected,
    }
}

fn compact_json(value: &ConfigValue) -> String {
    envcfg_content::render_with(
        value,
        envcfg_content::RenderFormat::Json,
        envcfg_content::RenderOptions { compact_json: true },
    )
    .map(|s| s.trim_end().to_string())
    .unwrap_or_else(|_| value.kind().to_string())
}
