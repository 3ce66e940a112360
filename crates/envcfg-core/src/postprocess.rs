//! External formatters applied to rendered text

use std::time::Duration;

use envcfg_content::RenderFormat;
use tracing::debug;

use crate::config::PipelineConfig;
use crate::evaluator::EvaluationError;
use crate::process::CommandRunner;

/// Rewrites rendered text before it is written
pub trait PostProcessor: Send + Sync {
    fn process(&self, format: RenderFormat, text: String) -> Result<String, EvaluationError>;

    /// Programs needed to post-process `format`.
    fn required_tools(&self, _format: RenderFormat) -> Vec<String> {
        Vec::new()
    }
}

/// Leaves rendered text untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPostProcess;

impl PostProcessor for NoPostProcess {
    fn process(&self, _format: RenderFormat, text: String) -> Result<String, EvaluationError> {
        Ok(text)
    }
}

/// Pipes rendered text through the command configured for its format
#[derive(Debug, Clone)]
pub struct CommandPostProcessor {
    config: PipelineConfig,
    runner: CommandRunner,
}

impl CommandPostProcessor {
    pub fn from_config(config: &PipelineConfig) -> Self {
        let secs = config.evaluator.timeout_secs;
        Self {
            config: config.clone(),
            runner: CommandRunner::new((secs > 0).then(|| Duration::from_secs(secs))),
        }
    }
}

impl PostProcessor for CommandPostProcessor {
    fn process(&self, format: RenderFormat, text: String) -> Result<String, EvaluationError> {
        let Some(argv) = self.config.post_process.command_for(format) else {
            return Ok(text);
        };
        debug!(%format, program = %argv[0], "Post-processing rendered output");
        let output = self.runner.run_checked(argv, Some(&text))?;
        if output.trim().is_empty() && !text.trim().is_empty() {
            return Err(EvaluationError::InvalidOutput {
                program: argv[0].clone(),
                message: "formatter returned no output".to_string(),
            });
        }
        Ok(output)
    }

    fn required_tools(&self, format: RenderFormat) -> Vec<String> {
        self.config
            .post_process
            .command_for(format)
            .and_then(|argv| argv.first())
            .cloned()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_command(format: &str, argv: &[&str]) -> CommandPostProcessor {
        let list = argv.iter().map(|a| format!("{a:?}")).collect::<Vec<_>>().join(", ");
        let config = PipelineConfig::parse(&format!("[post_process]\n{format} = [{list}]\n")).unwrap();
        CommandPostProcessor::from_config(&config)
    }

    #[test]
    fn unconfigured_format_passes_through() {
        let post = with_command("hcl", &["tofu", "fmt", "-"]);
        assert_eq!(post.process(RenderFormat::Env, "A=1\n".to_string()).unwrap(), "A=1\n");
        assert!(post.required_tools(RenderFormat::Env).is_empty());
        assert_eq!(post.required_tools(RenderFormat::Hcl), vec!["tofu"]);
    }

    #[cfg(unix)]
    #[test]
    fn command_rewrites_text() {
        let post = with_command("env", &["tr", "a-z", "A-Z"]);
        assert_eq!(
            post.process(RenderFormat::Env, "key=value\n".to_string()).unwrap(),
            "KEY=VALUE\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn empty_formatter_output_is_rejected() {
        let post = with_command("toml", &["true"]);
        let err = post.process(RenderFormat::Toml, "a = 1\n".to_string()).unwrap_err();
        assert!(matches!(err, EvaluationError::InvalidOutput { .. }));
    }
}
