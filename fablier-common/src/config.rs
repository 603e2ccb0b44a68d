//! Configuration loading and data directory resolution
//!
//! Resolution priority for the data directory:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable `FABLIER_DATA_DIR`
//! 3. TOML config file (`data_dir` key)
//! 4. OS-dependent compiled default (fallback)

use crate::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "FABLIER_DATA_DIR";

/// Optional TOML configuration file contents
///
/// Missing file or missing keys never abort startup; every field falls
/// back to a compiled default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Data directory holding fablier.db
    pub data_dir: Option<PathBuf>,
    /// Bind address for the HTTP server
    pub bind: Option<String>,
    /// HTTP port
    pub port: Option<u16>,
    /// YouTube Data API key (channel sync)
    pub youtube_api_key: Option<String>,
    /// Twitch client id (channel sync)
    pub twitch_client_id: Option<String>,
    /// Twitch client secret (channel sync)
    pub twitch_client_secret: Option<String>,
}

impl TomlConfig {
    /// Load the config file from the platform config directory, if present.
    ///
    /// A missing file yields the default (empty) config; a malformed file
    /// logs a warning and yields the default rather than aborting.
    pub fn load() -> TomlConfig {
        let Some(path) = config_file_path() else {
            return TomlConfig::default();
        };
        Self::load_from(&path)
    }

    /// Load a specific TOML file, degrading to defaults on any failure.
    pub fn load_from(path: &Path) -> TomlConfig {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<TomlConfig>(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Malformed config file {}: {} (using defaults)", path.display(), e);
                    TomlConfig::default()
                }
            },
            Err(_) => TomlConfig::default(),
        }
    }
}

/// Default configuration file path for the platform
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("fablier").join("config.toml"))
}

/// Resolve the data directory following the priority order above
pub fn resolve_data_dir(cli_arg: Option<&Path>, toml_config: &TomlConfig) -> PathBuf {
    // Priority 1: command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: environment variable
    if let Ok(path) = std::env::var(DATA_DIR_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &toml_config.data_dir {
        return path.clone();
    }

    // Priority 4: OS-dependent compiled default
    default_data_dir()
}

/// OS-dependent default data directory
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("fablier"))
        .unwrap_or_else(|| PathBuf::from("./fablier_data"))
}

/// Ensure the data directory exists and return the database file path
pub fn ensure_database_path(data_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(data_dir)?;
    Ok(data_dir.join("fablier.db"))
}
