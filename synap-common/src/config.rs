//! Configuration loading and root folder resolution
//!
//! Bootstrap settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing or unreadable TOML file is never fatal: a warning is logged and
//! the remaining tiers are used.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Application directory name used for config and data folders
pub const APP_DIR_NAME: &str = "synap-directory";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "synap.db";

pub const ENV_ROOT_FOLDER: &str = "SYNAP_ROOT_FOLDER";
pub const ENV_BIND: &str = "SYNAP_BIND";
pub const ENV_CLOUDINARY_CLOUD_NAME: &str = "CLOUDINARY_CLOUD_NAME";
pub const ENV_CLOUDINARY_API_KEY: &str = "CLOUDINARY_API_KEY";
pub const ENV_CLOUDINARY_API_SECRET: &str = "CLOUDINARY_API_SECRET";

const DEFAULT_BIND: &str = "127.0.0.1:3000";
const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 7;
/// Longest accepted session lifetime (ten years)
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365 * 10;

/// Contents of the optional TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the database file
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Socket address the HTTP server binds to
    #[serde(default)]
    pub bind: Option<String>,

    /// Admin session lifetime in hours
    #[serde(default)]
    pub session_ttl_hours: Option<i64>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub image_host: ImageHostConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Credentials for the hosted image service
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ImageHostConfig {
    #[serde(default)]
    pub cloud_name: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_secret: Option<String>,
}

impl ImageHostConfig {
    /// All three credentials present and non-empty
    pub fn is_configured(&self) -> bool {
        [&self.cloud_name, &self.api_key, &self.api_secret]
            .iter()
            .all(|v| v.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }

    /// Environment variables override individual TOML values
    fn overlay_env(mut self) -> Self {
        if let Ok(v) = std::env::var(ENV_CLOUDINARY_CLOUD_NAME) {
            self.cloud_name = Some(v);
        }
        if let Ok(v) = std::env::var(ENV_CLOUDINARY_API_KEY) {
            self.api_key = Some(v);
        }
        if let Ok(v) = std::env::var(ENV_CLOUDINARY_API_SECRET) {
            self.api_secret = Some(v);
        }
        self
    }
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid TOML in {}: {}", path.display(), e)))
    }
}

/// Values supplied on the command line (highest priority tier)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub root_folder: Option<PathBuf>,
    pub bind: Option<String>,
    pub config_path: Option<PathBuf>,
}

/// Fully resolved bootstrap configuration
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    pub root_folder: PathBuf,
    pub bind: String,
    pub session_ttl_hours: i64,
    pub log_level: String,
    pub image_host: ImageHostConfig,
}

impl BootstrapConfig {
    /// Resolve configuration from CLI overrides, environment, TOML and defaults
    pub fn resolve(overrides: &ConfigOverrides) -> Self {
        let toml_config = load_toml_tier(overrides.config_path.as_deref());

        let root_folder = overrides
            .root_folder
            .clone()
            .or_else(|| std::env::var(ENV_ROOT_FOLDER).ok().map(PathBuf::from))
            .or_else(|| toml_config.root_folder.clone())
            .unwrap_or_else(default_root_folder);

        let bind = overrides
            .bind
            .clone()
            .or_else(|| std::env::var(ENV_BIND).ok())
            .or_else(|| toml_config.bind.clone())
            .unwrap_or_else(|| DEFAULT_BIND.to_string());

        let session_ttl_hours = match toml_config.session_ttl_hours {
            Some(hours) if (1..=MAX_SESSION_TTL_HOURS).contains(&hours) => hours,
            Some(hours) => {
                warn!(
                    session_ttl_hours = hours,
                    max = MAX_SESSION_TTL_HOURS,
                    "session_ttl_hours out of range, using default"
                );
                DEFAULT_SESSION_TTL_HOURS
            }
            None => DEFAULT_SESSION_TTL_HOURS,
        };

        Self {
            root_folder,
            bind,
            session_ttl_hours,
            log_level: toml_config.logging.level.clone(),
            image_host: toml_config.image_host.overlay_env(),
        }
    }

    /// Path of the SQLite database file
    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }

    /// Create the root folder if it is missing
    pub fn ensure_root_folder(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            info!("Created root folder: {}", self.root_folder.display());
        }
        Ok(())
    }
}

/// Load the TOML tier, degrading to defaults on any failure
fn load_toml_tier(explicit: Option<&Path>) -> TomlConfig {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => default_config_file().filter(|p| p.exists()),
    };

    let Some(path) = path else {
        return TomlConfig::default();
    };

    match TomlConfig::load(&path) {
        Ok(config) => {
            info!("Loaded config file: {}", path.display());
            config
        }
        Err(e) => {
            warn!("Ignoring config file {}: {}", path.display(), e);
            TomlConfig::default()
        }
    }
}

/// Platform config file location (`<config_dir>/synap-directory/config.toml`)
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("config.toml"))
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("./synap_data"))
}
