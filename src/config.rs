//! Configuration constants and utilities for httprasa
//!
//! The configuration directory is resolved from the environment first and
//! `config.json` inside it may list default command line options.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that overrides the configuration directory
pub const CONFIG_DIR_ENV_VAR: &str = "HTTPRASA_CONFIG_DIR";

/// Standard XDG base directory variable
pub const XDG_CONFIG_HOME_ENV_VAR: &str = "XDG_CONFIG_HOME";

pub const DEFAULT_CONFIG_DIRNAME: &str = "httprasa";
pub const DEFAULT_RELATIVE_XDG_CONFIG_HOME: &str = "~/.config";
pub const DEFAULT_LEGACY_CONFIG_DIR: &str = "~/.httprasa";
pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config file: {source} [{}]", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot read config file: {source}")]
    Unreadable {
        #[source]
        source: std::io::Error,
    },
}

/// Options read from `config.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub default_options: Vec<String>,
}

impl Config {
    /// Load `config.json` from `dir`; a missing file gives the defaults
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        tracing::debug!("Loading config from '{}'", path.display());

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config file at '{}', using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Unreadable { source }),
        };

        serde_json::from_str(&contents).map_err(|source| ConfigError::Invalid { path, source })
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// Get the config directory, checking the environment variable first, then
/// the platform default
pub fn get_config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV_VAR) {
        return PathBuf::from(dir);
    }

    if cfg!(windows) {
        if let Some(app_data) = std::env::var_os("APPDATA") {
            return PathBuf::from(app_data).join(DEFAULT_CONFIG_DIRNAME);
        }
    }

    let legacy = expand(DEFAULT_LEGACY_CONFIG_DIR);
    if legacy.exists() {
        return legacy;
    }

    std::env::var_os(XDG_CONFIG_HOME_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| expand(DEFAULT_RELATIVE_XDG_CONFIG_HOME))
        .join(DEFAULT_CONFIG_DIRNAME)
}
