// configs/loader.rs

// Reads and writes configurations as YAML. A loaded configuration is validated
// before it is handed out, so range violations surface at load time.

// Dependencies
use log::info;
use std::fs::File;
use std::path::Path;

use super::RpuConfigKind;
use crate::ConfigError;

/// Parses and validates a configuration from YAML text
pub fn from_yaml_str(text: &str) -> Result<RpuConfigKind, ConfigError> {
    let config: RpuConfigKind = serde_yaml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Loads and validates a configuration from a YAML file
pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<RpuConfigKind, ConfigError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
    let config: RpuConfigKind = serde_yaml::from_reader(file)
        .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;
    config.validate()?;
    info!("Loaded {} configuration from {}", config.name(), path.display());
    Ok(config)
}

/// Serializes a configuration to YAML text
pub fn to_yaml_string(config: &RpuConfigKind) -> Result<String, ConfigError> {
    serde_yaml::to_string(config).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Writes a configuration to a YAML file
pub fn save_yaml_file(config: &RpuConfigKind, path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
    serde_yaml::to_writer(file, config).map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
    info!("Saved {} configuration to {}", config.name(), path.display());
    Ok(())
}
