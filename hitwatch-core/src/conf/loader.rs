use crate::conf::error::ConfigError;
use crate::conf::types::{ConfigOverrides, HitwatchConfig};
use crate::conf::validate::validate_config;
use std::fs;
use std::path::Path;

/// Reads an HCL config file. Missing sections and fields take their defaults.
pub fn load_config_file(path: &Path) -> Result<HitwatchConfig, ConfigError> {
    let src = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    hcl::from_str(&src).map_err(|e| ConfigError::parse(path, e))
}

/// Loads the optional config file, layers CLI overrides on top and validates.
pub fn load_config(
    path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<HitwatchConfig, ConfigError> {
    let base = match path {
        Some(path) => load_config_file(path)?,
        None => HitwatchConfig::default(),
    };

    let cfg = overrides.apply(base);
    validate_config(&cfg)?;

    tracing::debug!(
        log_file = ?cfg.log_file,
        threshold = cfg.alert.threshold,
        window_secs = cfg.alert.window_secs,
        "config resolved"
    );

    Ok(cfg)
}
