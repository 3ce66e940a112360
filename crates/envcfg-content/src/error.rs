//! Error types for envcfg-content

use crate::format::RenderFormat;
use crate::path::KeyPath;

/// Result type for envcfg-content operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing or rendering a document
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse JSON document: {message}")]
    Parse { message: String },

    #[error("{format} output requires an object at the document root")]
    RootMustBeObject { format: RenderFormat },

    #[error("List at {path} mixes tables with other values")]
    HeterogeneousList { path: KeyPath },

    #[error("Nested object at {path} cannot be written as a flat entry")]
    NestedObjectNotSupported { path: KeyPath },

    #[error("Array of tables at {path} is nested inside another array of tables")]
    UnsupportedNesting { path: KeyPath },

    #[error("Key {path} is not a valid {format} name")]
    InvalidKey { format: RenderFormat, path: KeyPath },

    #[error("Failed to serialize {format} output: {message}")]
    Serialize {
        format: RenderFormat,
        message: String,
    },

    #[error("Unknown output format: {0}")]
    UnknownFormat(String),
}

impl Error {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// The key path of the offending value, for structural render errors.
    pub fn path(&self) -> Option<&KeyPath> {
        match self {
            Self::HeterogeneousList { path }
            | Self::NestedObjectNotSupported { path }
            | Self::UnsupportedNesting { path }
            | Self::InvalidKey { path, .. } => Some(path),
            _ => None,
        }
    }
}
