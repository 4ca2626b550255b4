use crate::config::MaskConfig;
use crate::error::Result;

/// Print the effective configuration as YAML.
pub fn run_show(config: &MaskConfig) -> Result<()> {
    print!("{}", config.to_yaml()?);
    Ok(())
}
