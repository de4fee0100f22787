//! Engine configuration files
//!
//! Configuration is JSON with the shape of [`EngineConfig`]; every field is
//! optional. The path can also come from the `FUZZMATCH_CONFIG` environment
//! variable.

use std::path::{Path, PathBuf};

use fuzzmatch_core::{EngineConfig, MatchEngine};
use tracing::{debug, info};

use crate::error::Result;

/// Environment variable naming a configuration file
pub const CONFIG_ENV: &str = "FUZZMATCH_CONFIG";

/// Parse and validate a JSON configuration.
pub fn parse_config(json: &str) -> Result<EngineConfig> {
    let config: EngineConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

/// Read, parse and validate a configuration file.
pub fn load_config(path: impl AsRef<Path>) -> Result<EngineConfig> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let config = parse_config(&json)?;
    info!(path = %path.display(), "Loaded engine configuration");
    Ok(config)
}

/// Configuration file named by `FUZZMATCH_CONFIG`, or defaults when unset.
pub fn load_from_env() -> Result<EngineConfig> {
    match config_path_from_env() {
        Some(path) => load_config(path),
        None => {
            debug!("{CONFIG_ENV} not set, using default configuration");
            Ok(EngineConfig::default())
        }
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var_os(CONFIG_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Build a [`MatchEngine`] from a configuration file.
pub fn engine_from_file(path: impl AsRef<Path>) -> Result<MatchEngine> {
    Ok(MatchEngine::with_config(load_config(path)?)?)
}
