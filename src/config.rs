//! Configuration options

use crate::utils::deserialize_shellexpand;
use anyhow::{Context, Result};
use colored::Colorize;
use directories::BaseDirs;
use format_serde_error::SerdeError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{
    env,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

/// Configuration file name
const CONFIG_FILE: &str = "rrflow.yml";

/// Configuration written when none exists yet
const DEFAULT_CONFIG: &str = include_str!("../assets/rrflow.yml");

// =============== GlobalSettings ================= [[[

/// Global configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct GlobalSettings {
    /// Whether logs should be written to a file
    #[serde(alias = "log-to-file")]
    pub(crate) log_to_file: bool,

    /// The directory to write the log to
    #[serde(alias = "log-dir", deserialize_with = "deserialize_shellexpand")]
    pub(crate) log_dir: Option<PathBuf>,

    /// The X screen to work on. The screen of the display is used when unset
    pub(crate) screen: Option<usize>,

    /// Put the layout back as it was found once a command finishes
    #[serde(alias = "restore-on-exit")]
    pub(crate) restore_on_exit: bool,

    /// Print monitor listings as JSON
    pub(crate) json: bool,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            log_to_file:     false,
            log_dir:         None,
            screen:          None,
            restore_on_exit: false,
            json:            false,
        }
    }
}

// ]]] === GlobalSettings ===

// ==================== Config ==================== [[[

/// Configuration file
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Config {
    /// Global settings
    #[serde(flatten)]
    pub(crate) global: GlobalSettings,
}

impl Config {
    /// Create the default configuration file
    pub(crate) fn create_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            log::debug!("Creating configuration path: {}", path.display());
            fs::create_dir_all(path).context("unable to create configuration directory")?;
        }

        let path = path.join(CONFIG_FILE);
        log::debug!("{}: {}", "Configuration path".bright_blue(), path.display());

        if !path.is_file() {
            let mut config_file: fs::File = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .open(&path)
                .with_context(|| format!("could not create rrflow config: '{}'", path.display()))?;

            config_file
                .write_all(DEFAULT_CONFIG.as_bytes())
                .with_context(|| format!("could not create rrflow config: '{}'", path.display()))?;
            config_file.flush()?;
        }

        Self::load(path)
    }

    /// Load the configuration file from a given path
    pub(crate) fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: '{}'", path.display()))?;

        Self::parse(file)
    }

    /// Parse the contents of a configuration file
    pub(crate) fn parse(file: String) -> Result<Self> {
        // An empty file is valid YAML but not a valid mapping
        if file.trim().is_empty() {
            return Ok(Self::default());
        }

        let res = serde_yaml::from_str(&file).map_err(|e| SerdeError::new(file, e))?;
        Ok(res)
    }

    /// Load the default configuration file
    pub(crate) fn load_default() -> Result<Self> {
        let path = PROJECT_DIRS
            .as_ref()
            .map(RrflowDirs::config_dir)
            .context("could not detect the user's home directory")?;
        log::debug!("loading default config: {}", path.display());
        Self::create_default(path)
    }
}

// ]]] === Config ===

// ================ Project Dirs ================== [[[

/// Get the base [`RrflowDirs`]
pub(crate) static PROJECT_DIRS: Lazy<Option<RrflowDirs>> = Lazy::new(RrflowDirs::new);

/// Get the project directories relevant to `rrflow`
#[derive(Debug, Clone)]
pub(crate) struct RrflowDirs {
    /// User's `$XDG_CONFIG_HOME/rrflow` directory
    config_dir: PathBuf,
}

impl RrflowDirs {
    /// Create a new [`RrflowDirs`]
    fn new() -> Option<Self> {
        Some(Self {
            config_dir: Self::get_dir("RRFLOW_CONFIG_DIR", "XDG_CONFIG_HOME", ".config")?,
        })
    }

    /// Wrapper function that makes it easier to get directories
    fn get_dir(env_var: &str, var: &str, join: &str) -> Option<PathBuf> {
        let from_home = || {
            BaseDirs::new()
                .map(|p| p.home_dir().join(join))
                .map(|p| p.join(env!("CARGO_PKG_NAME")))
        };

        match env::var_os(env_var).map(PathBuf::from) {
            // Custom env var is set
            Some(v) if v.is_absolute() => Some(v),
            Some(_) => from_home(),
            None => env::var_os(var)
                .map(PathBuf::from)
                .filter(|p| p.is_absolute())
                .map(|p| p.join(env!("CARGO_PKG_NAME")))
                .or_else(from_home),
        }
    }

    /// Get configuration directory
    #[must_use]
    pub(crate) fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}

// ]]] === Project Dirs ===

#[cfg(test)]
mod tests {
    use super::{Config, GlobalSettings, DEFAULT_CONFIG};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn shipped_config_is_the_default() {
        let config = Config::parse(DEFAULT_CONFIG.to_owned()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn both_key_styles_are_accepted() {
        let config = Config::parse(String::from(
            "log-to-file: true\nlog_dir: /tmp/rrflow-logs\nscreen: 1\nrestore_on_exit: true\n",
        ))
        .unwrap();

        assert_eq!(config.global, GlobalSettings {
            log_to_file:     true,
            log_dir:         Some(PathBuf::from("/tmp/rrflow-logs")),
            screen:          Some(1),
            restore_on_exit: true,
            json:            false,
        });
    }

    #[test]
    fn empty_file_uses_defaults() {
        assert_eq!(Config::parse(String::new()).unwrap(), Config::default());
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(Config::parse(String::from("screen: primary\n")).is_err());
    }
}
