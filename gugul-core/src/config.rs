//! src/config.rs
//! ============================================================================
//! # Config: Application Configuration Loader and Saver
//!
//! Manages all user-editable settings for the search client. Loads and saves
//! settings as TOML from the platform config path using the
//! [`directories`](https://docs.rs/directories) crate.
//!
//! ## Example
//! ```rust,ignore
//! let config = Config::load().await?;
//! config.save().await?;
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use tokio::fs as TokioFs;

use crate::error::AppError;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "gugul";
const APPLICATION: &str = "Gugul";

/// App theme (color scheme) selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,

    Light,

    Dark,
}

/// Timing of the debounced search pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period before loading placeholders appear
    #[serde(with = "humantime_serde")]
    pub loading_delay: Duration,

    /// Quiet period before a typed query is dispatched
    #[serde(with = "humantime_serde")]
    pub search_delay: Duration,

    /// Placeholder rows shown while a search is in flight
    pub placeholder_rows: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            loading_delay: Duration::from_millis(350),
            search_delay: Duration::from_millis(900),
            placeholder_rows: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Length of the smooth scroll animation
    #[serde(with = "humantime_serde")]
    pub duration: Duration,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(200),
        }
    }
}

/// Which search provider answers queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
    /// JSON file of records searched in-process.
    Index {
        /// Defaults to `index.json` in the config directory
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<PathBuf>,
    },

    /// External program printing a JSON result list on stdout.
    Command {
        program: String,

        #[serde(default)]
        args: Vec<String>,

        /// Exit code the program uses to signal rate limiting
        #[serde(default = "default_rate_limit_exit_code")]
        rate_limit_exit_code: i32,

        #[serde(default = "default_command_timeout", with = "humantime_serde")]
        timeout: Duration,
    },
}

const fn default_rate_limit_exit_code() -> i32 {
    // EX_TEMPFAIL
    75
}

const fn default_command_timeout() -> Duration {
    Duration::from_secs(15)
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::Index { path: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Defaults to `logs/` in the platform data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            level: "info".to_string(),
        }
    }
}

/// Main configuration struct for the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub theme: Theme,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub scroll: ScrollConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Loads config from the platform config dir, writing defaults when the
    /// file does not exist yet.
    ///
    /// The config is expected at `$XDG_CONFIG_HOME/gugul/config.toml`
    /// (Linux), or equivalent on Windows/macOS.
    pub async fn load() -> Result<Self, AppError> {
        let path = Self::config_path()?;
        if TokioFs::try_exists(&path)
            .await
            .map_err(|e| AppError::config_io(&path, e))?
        {
            Self::load_from(&path).await
        } else {
            info!(
                "No config file found at {}, using default configuration. Creating it now.",
                path.display()
            );

            let default_config = Self::default();
            default_config.save_to(&path).await?;

            Ok(default_config)
        }
    }

    /// Loads config from an explicit file.
    pub async fn load_from(path: &Path) -> Result<Self, AppError> {
        info!("Loading config from {}", path.display());
        let text = TokioFs::read_to_string(path)
            .await
            .map_err(|e| AppError::config_io(path, e))?;

        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, AppError> {
        Ok(toml::from_str(text)?)
    }

    /// Saves config to the platform config dir.
    pub async fn save(&self) -> Result<(), AppError> {
        self.save_to(&Self::config_path()?).await
    }

    pub async fn save_to(&self, path: &Path) -> Result<(), AppError> {
        info!("Saving config to {}", path.display());

        if let Some(parent) = path.parent() {
            TokioFs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::config_io(parent, e))?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        TokioFs::write(path, toml_str)
            .await
            .map_err(|e| AppError::config_io(path, e))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs, AppError> {
        ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .ok_or(AppError::NoProjectDir("config"))
    }

    /// Returns the canonical config file path.
    pub fn config_path() -> Result<PathBuf, AppError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn config_dir() -> Result<PathBuf, AppError> {
        Ok(Self::project_dirs()?.config_dir().to_path_buf())
    }

    /// Index file used by the default backend.
    pub fn index_path(&self) -> Result<PathBuf, AppError> {
        match &self.backend {
            BackendConfig::Index { path: Some(path) } => Ok(path.clone()),
            _ => Ok(Self::config_dir()?.join("index.json")),
        }
    }

    pub fn log_dir(&self) -> Result<PathBuf, AppError> {
        match &self.logging.dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::project_dirs()?.data_dir().join("logs")),
        }
    }
}
