//! Configuration loading.
//!
//! Every section is optional; missing keys fall back to their defaults.
//!
//! ```toml
//! [generator]
//! node_count = 100
//! width = 1000.0
//! height = 1000.0
//! max_range = 150.0
//! seed = 42
//!
//! [routing]
//! objective = "distance"      # or "hop-count"
//! rule = "either-in-range"    # or "mutual-range"
//!
//! [logging]
//! level = "info"
//! ```

use log::LevelFilter;
use serde::Deserialize;
use std::path::Path;

use crate::analysis::PathObjective;
use crate::topology::{ConnectivityRule, GeneratorParams};

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "iot-network.toml";

/// Path search and connectivity settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub objective: PathObjective,
    pub rule: ConnectivityRule,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig { level: "info".to_string() }
    }
}

impl LoggingConfig {
    pub fn level_filter(&self) -> Result<LevelFilter, String> {
        self.level.parse::<LevelFilter>().map_err(|_| format!("Unknown log level '{}'", self.level))
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub generator: GeneratorParams,
    pub routing: RoutingConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `config_path` - Path to the TOML file
    ///
    /// # Returns
    /// * `Ok(AppConfig)` if the file was successfully loaded and parsed
    /// * `Err(String)` with a descriptive error message otherwise
    pub fn load(config_path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(config_path).map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Load `config_path` if given, otherwise `DEFAULT_CONFIG_FILE` when it
    /// exists, otherwise the defaults.
    pub fn load_or_default(config_path: Option<&Path>) -> Result<Self, String> {
        match config_path {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() { Self::load(fallback) } else { Ok(Self::default()) }
            }
        }
    }
}
