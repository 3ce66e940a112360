//! `envcfg config`

use envcfg_core::PipelineConfig;

use crate::error::Result;

/// Print the resolved configuration as TOML.
pub fn run_config(config: &PipelineConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}
