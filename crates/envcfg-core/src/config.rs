//! Pipeline configuration loaded from `envcfg.toml`
//!
//! Resolution is layered: built-in defaults, then an optional TOML file,
//! then explicit overrides handed in by the caller. Nothing here reads
//! process environment variables; the CLI collects them and passes them to
//! [`PipelineConfig::apply_overrides`].

use std::path::{Path, PathBuf};

use envcfg_content::RenderFormat;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "envcfg.toml";

/// Override variable for [`FrontendConfig::host`]
pub const ENV_FRONTEND_HOST: &str = "ENVCFG_FRONTEND_HOST";
/// Override variable for [`FrontendConfig::port`]
pub const ENV_FRONTEND_PORT: &str = "ENVCFG_FRONTEND_PORT";
/// Override variable for [`EvaluatorConfig::timeout_secs`]
pub const ENV_EVALUATOR_TIMEOUT: &str = "ENVCFG_EVALUATOR_TIMEOUT_SECS";

fn default_validate() -> Vec<String> {
    ["cue", "vet", "-c", "{schema}", "{source}"]
        .map(String::from)
        .to_vec()
}

fn default_export() -> Vec<String> {
    ["cue", "export", "{schema}", "{source}", "--out", "json"]
        .map(String::from)
        .to_vec()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// How the external evaluator is invoked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Validate command line; `{source}` and `{schema}` are substituted
    #[serde(default = "default_validate")]
    pub validate: Vec<String>,

    /// Export command line; must print the merged document as JSON
    #[serde(default = "default_export")]
    pub export: Vec<String>,

    /// Schema package or file handed to both commands
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<PathBuf>,

    /// Seconds before a hung evaluator is killed; 0 disables the limit
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            validate: default_validate(),
            export: default_export(),
            schema: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Backup behaviour before a destination is replaced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Directory for backups; next to the destination when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
        }
    }
}

/// External formatters applied to rendered text, one per format
///
/// Each command reads the rendered text on stdin and prints the
/// replacement on stdout, e.g. `hcl = ["tofu", "fmt", "-"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostProcessConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaml: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toml: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hcl: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<Vec<String>>,
}

impl PostProcessConfig {
    /// The command configured for `format`, if any.
    pub fn command_for(&self, format: RenderFormat) -> Option<&[String]> {
        let command = match format {
            RenderFormat::Json => &self.json,
            RenderFormat::Yaml => &self.yaml,
            RenderFormat::Toml => &self.toml,
            RenderFormat::Hcl => &self.hcl,
            RenderFormat::Env => &self.env,
        };
        command.as_deref().filter(|argv| !argv.is_empty())
    }
}

/// Where the interactive collector listens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontendConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl FrontendConfig {
    /// `host:port`
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Extra tools that must be installed before a run starts
    #[serde(default)]
    pub tools: Vec<String>,

    #[serde(default)]
    pub evaluator: EvaluatorConfig,

    #[serde(default)]
    pub backup: BackupConfig,

    #[serde(default)]
    pub post_process: PostProcessConfig,

    #[serde(default)]
    pub frontend: FrontendConfig,
}

impl PipelineConfig {
    /// Parse configuration from TOML text.
    ///
    /// ```
    /// use envcfg_core::PipelineConfig;
    ///
    /// let config = PipelineConfig::parse("[frontend]\nport = 9000\n").unwrap();
    /// assert_eq!(config.frontend.port, 9000);
    /// assert_eq!(config.frontend.host, "127.0.0.1");
    /// ```
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load a configuration file. The file must exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::InputNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = envcfg_fs::io::read_text(path)?;
        let config = Self::parse(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;
        debug!(path = %path.display(), "Loaded pipeline config");
        Ok(config)
    }

    /// Resolve the file layer: `explicit` if given, else
    /// [`DEFAULT_CONFIG_FILE`] in `dir` if present, else defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            debug!("No config file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Apply `ENVCFG_*` overrides from an explicit list of variables.
    ///
    /// Unrelated names are ignored. Values that do not parse are reported
    /// as [`Error::Config`] against the variable name.
    pub fn apply_overrides<I, K, V>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in vars {
            let (name, value) = (name.as_ref(), value.as_ref().trim());
            match name {
                ENV_FRONTEND_HOST => self.frontend.host = value.to_string(),
                ENV_FRONTEND_PORT => self.frontend.port = parse_override(name, value)?,
                ENV_EVALUATOR_TIMEOUT => self.evaluator.timeout_secs = parse_override(name, value)?,
                _ => continue,
            }
            debug!(variable = name, "Applied config override");
        }
        Ok(())
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

fn parse_override<T: std::str::FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| Error::Config {
        path: PathBuf::from(format!("${name}")),
        message: format!("'{value}' is not valid: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn defaults_target_cue() {
        let config = PipelineConfig::default();
        assert_eq!(config.evaluator.validate, vec!["cue", "vet", "-c", "{schema}", "{source}"]);
        assert_eq!(config.evaluator.timeout_secs, 60);
        assert!(config.backup.enabled);
        assert_eq!(config.frontend.address(), "127.0.0.1:8080");
        assert!(config.post_process.command_for(RenderFormat::Hcl).is_none());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = PipelineConfig::parse(
            r#"
tools = ["ansible"]

[evaluator]
schema = "schema/"
timeout_secs = 5

[post_process]
hcl = ["tofu", "fmt", "-"]
"#,
        )
        .unwrap();

        assert_eq!(config.evaluator.schema, Some(PathBuf::from("schema/")));
        assert_eq!(config.evaluator.timeout_secs, 5);
        assert_eq!(config.evaluator.export, default_export());
        assert_eq!(
            config.post_process.command_for(RenderFormat::Hcl),
            Some(&["tofu".to_string(), "fmt".to_string(), "-".to_string()][..])
        );
        assert_eq!(config.tools, vec!["ansible"]);
    }

    #[test]
    fn empty_post_process_command_is_ignored() {
        let config = PipelineConfig::parse("[post_process]\nyaml = []\n").unwrap();
        assert!(config.post_process.command_for(RenderFormat::Yaml).is_none());
    }

    #[test]
    fn overrides_apply_in_order() {
        let mut config = PipelineConfig::default();
        config
            .apply_overrides([
                ("ENVCFG_FRONTEND_HOST", "0.0.0.0"),
                ("ENVCFG_FRONTEND_PORT", " 9090 "),
                ("ENVCFG_EVALUATOR_TIMEOUT_SECS", "0"),
                ("HOME", "/root"),
            ])
            .unwrap();
        assert_eq!(config.frontend.address(), "0.0.0.0:9090");
        assert_eq!(config.evaluator.timeout_secs, 0);
    }

    #[test]
    fn bad_override_names_the_variable() {
        let mut config = PipelineConfig::default();
        let err = config
            .apply_overrides([("ENVCFG_FRONTEND_PORT", "eighty")])
            .unwrap_err();
        assert!(err.to_string().contains("ENVCFG_FRONTEND_PORT"), "{err}");
    }

    #[test]
    fn discover_prefers_explicit_then_working_dir() {
        let temp = TempDir::new().unwrap();
        assert_eq!(PipelineConfig::discover(None, temp.path()).unwrap(), PipelineConfig::default());

        std::fs::write(temp.path().join(DEFAULT_CONFIG_FILE), "[frontend]\nport = 1\n").unwrap();
        assert_eq!(PipelineConfig::discover(None, temp.path()).unwrap().frontend.port, 1);

        let explicit = temp.path().join("other.toml");
        std::fs::write(&explicit, "[frontend]\nport = 2\n").unwrap();
        assert_eq!(
            PipelineConfig::discover(Some(&explicit), temp.path()).unwrap().frontend.port,
            2
        );
    }

    #[test]
    fn missing_explicit_file_is_input_not_found() {
        let temp = TempDir::new().unwrap();
        let err = PipelineConfig::discover(Some(&temp.path().join("nope.toml")), temp.path()).unwrap_err();
        assert!(matches!(err, Error::InputNotFound { .. }));
    }

    #[test]
    fn malformed_file_is_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("envcfg.toml");
        std::fs::write(&path, "[frontend\n").unwrap();
        assert!(matches!(PipelineConfig::load(&path).unwrap_err(), Error::Config { .. }));
    }

    #[test]
    fn toml_output_parses_back() {
        let mut config = PipelineConfig::default();
        config.evaluator.schema = Some(PathBuf::from("schema"));
        config.post_process.env = Some(vec!["sort".to_string()]);
        let text = config.to_toml().unwrap();
        assert_eq!(PipelineConfig::parse(&text).unwrap(), config);
    }
}
