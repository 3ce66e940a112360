//! Output formats and the renderer trait

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::value::{ConfigValue, Object};

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    Json,
    Yaml,
    Toml,
    /// Flat HCL assignment file (`.tfvars`)
    Hcl,
    /// `KEY=VALUE` lines (`.env`)
    Env,
}

impl RenderFormat {
    pub const ALL: [RenderFormat; 5] = [Self::Json, Self::Yaml, Self::Toml, Self::Hcl, Self::Env];

    /// Canonical lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Hcl => "hcl",
            Self::Env => "env",
        }
    }

    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            "hcl" | "tfvars" => Some(Self::Hcl),
            "env" => Some(Self::Env),
            _ => None,
        }
    }

    /// Get default file extensions for this format
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Json => &["json"],
            Self::Yaml => &["yaml", "yml"],
            Self::Toml => &["toml"],
            Self::Hcl => &["tfvars", "hcl"],
            Self::Env => &["env"],
        }
    }

    /// Whether the document root must be an object for this format.
    pub fn requires_object_root(&self) -> bool {
        !matches!(self, Self::Json)
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
            Self::Toml => "TOML",
            Self::Hcl => "HCL",
            Self::Env => "ENV",
        };
        f.write_str(label)
    }
}

impl FromStr for RenderFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            "hcl" | "tfvars" => Ok(Self::Hcl),
            "env" | "dotenv" => Ok(Self::Env),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

/// Trait for format-specific renderers
pub trait FormatRenderer: Send + Sync {
    /// Format identifier
    fn format(&self) -> RenderFormat;

    /// Render a whole document
    fn render(&self, root: &ConfigValue) -> Result<String>;
}

/// Borrow the root as an object or fail with `RootMustBeObject`.
pub(crate) fn require_object(root: &ConfigValue, format: RenderFormat) -> Result<&Object> {
    root.as_object()
        .ok_or(Error::RootMustBeObject { format })
}
