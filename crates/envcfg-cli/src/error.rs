//! Error types for envcfg-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from envcfg-core
    #[error(transparent)]
    Core(#[from] envcfg_core::Error),

    /// Failed pipeline run
    #[error(transparent)]
    Pipeline(#[from] envcfg_core::PipelineError),

    /// Error from envcfg-content
    #[error(transparent)]
    Content(#[from] envcfg_content::Error),

    /// Error from envcfg-fs
    #[error(transparent)]
    Fs(#[from] envcfg_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML serialization error
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
