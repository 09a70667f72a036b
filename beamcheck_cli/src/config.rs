//! Configuration file loading for the CLI
//!
//! This module handles finding and loading the TOML settings file from
//! various locations (explicit path, local directory, system directory).
//!
//! ```toml
//! min_width_mm = 250.0
//!
//! [design]
//! fck_mpa = 35.0
//! nominal_cover_mm = 35.0
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use beamcheck_core::{CheckError, CheckResult, CheckSettings};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Failed to read configuration file: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Missing configuration file")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for CheckError {
    fn from(err: ConfigError) -> Self {
        let path = match &err {
            ConfigError::Parse { path, .. }
            | ConfigError::Read { path, .. }
            | ConfigError::MissingFile(path) => path.display().to_string(),
        };
        CheckError::config_error(path, err.to_string())
    }
}

/// Find and load settings from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (beamcheck/config.toml)
/// 3. Platform-specific config directory
/// 4. Default settings if none found
///
/// # Errors
///
/// Returns `CheckError::ConfigError` if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be read or parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> CheckResult<CheckSettings> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return Ok(load_config_file(path)?);
    }

    let local_config = Path::new("beamcheck/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return Ok(load_config_file(local_config)?);
    }

    if let Some(proj_dirs) = ProjectDirs::from("org", "beamcheck", "beamcheck") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return Ok(load_config_file(&system_config)?);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default settings");
    Ok(CheckSettings::default())
}

/// Load settings from a TOML file; missing keys keep their defaults
fn load_config_file(path: &Path) -> Result<CheckSettings, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
