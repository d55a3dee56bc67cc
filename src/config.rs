//! Command line and config file handling

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_FILE: &str = "iwara-tui.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Terminal client for a video-sharing site
#[derive(Debug, Parser)]
#[command(name = "iwara-tui", version, about)]
pub struct Cli {
    /// Path to the config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Catalog file to browse, overrides `source.catalog`
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Treat the active network as metered
    #[arg(long)]
    pub metered: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    pub catalog: PathBuf,
    pub page_size: usize,
    /// Stored session cookie; empty means logged out
    pub session: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from("catalog.json"),
            page_size: 20,
            session: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub command: String,
    pub args: Vec<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            command: "mpv".to_string(),
            args: vec!["--really-quiet".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    pub metered: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    /// Input poll interval in milliseconds
    pub tick_ms: u64,
    /// Delay before the video screen darkens the status bar
    pub status_bar_delay_ms: u64,
    pub preferences_file: PathBuf,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_ms: 50,
            status_bar_delay_ms: 500,
            preferences_file: PathBuf::from(".cache/preferences.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
    pub directory: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "iwara_tui=debug,warn".to_string(),
            directory: PathBuf::from(".logs"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub player: PlayerConfig,
    pub network: NetworkConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load the config file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Command line flags win over the file.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(catalog) = &cli.catalog {
            self.source.catalog = catalog.clone();
        }
        if cli.metered {
            self.network.metered = true;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "source.page_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.player.command.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "player.command",
                reason: "must not be empty".to_string(),
            });
        }
        if !(10..=1000).contains(&self.ui.tick_ms) {
            return Err(ConfigError::Invalid {
                field: "ui.tick_ms",
                reason: format!("{} is outside 10..=1000", self.ui.tick_ms),
            });
        }
        Ok(())
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.ui.tick_ms)
    }

    pub fn status_bar_delay(&self) -> Duration {
        Duration::from_millis(self.ui.status_bar_delay_ms)
    }

    pub fn session(&self) -> Option<String> {
        Some(self.source.session.clone()).filter(|s| !s.is_empty())
    }
}
