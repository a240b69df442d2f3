//! Configuration loading and catalog endpoint resolution

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result};

/// Compiled-in default catalog endpoint
pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:8000";

/// Environment variable consulted for the catalog endpoint
pub const SERVICE_URL_ENV: &str = "MIDICAT_SERVICE_URL";

/// Runtime configuration for a search session
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Base URL of the catalog service, no trailing slash required
    pub service_url: String,
    /// Autocomplete debounce window in milliseconds
    pub debounce_ms: u64,
    /// Minimum trimmed text length before autocomplete fires
    pub min_autocomplete_len: usize,
    /// Result limit sent with every search request
    pub search_limit: u32,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            debounce_ms: 300,
            min_autocomplete_len: 2,
            search_limit: 50,
            request_timeout_secs: 10,
        }
    }
}

/// On-disk config file shape; every key optional
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    service_url: Option<String>,
    debounce_ms: Option<u64>,
    min_autocomplete_len: Option<usize>,
    search_limit: Option<u32>,
    request_timeout_secs: Option<u64>,
}

impl SearchConfig {
    /// Load configuration, resolving the service URL by priority order:
    /// 1. Command-line argument (highest priority)
    /// 2. `MIDICAT_SERVICE_URL` environment variable
    /// 3. `service_url` key in the TOML config file
    /// 4. Compiled default (fallback)
    ///
    /// Tuning fields (debounce, limits, timeout) come from the config
    /// file when present, otherwise from defaults. A missing or
    /// malformed config file is ignored.
    pub fn load(cli_url: Option<&str>) -> Self {
        let env_url = std::env::var(SERVICE_URL_ENV).ok();

        let file = match config_file_path() {
            Ok(path) => match read_config_file(&path) {
                Ok(parsed) => {
                    tracing::debug!(path = %path.display(), "Loaded config file");
                    Some(parsed)
                }
                Err(e) => {
                    tracing::warn!("Ignoring config file: {}, using defaults", e);
                    None
                }
            },
            Err(_) => None,
        };

        Self::from_sources(cli_url, env_url, file)
    }

    /// Merge the three configuration sources over compiled defaults
    fn from_sources(
        cli_url: Option<&str>,
        env_url: Option<String>,
        file: Option<ConfigFile>,
    ) -> Self {
        let defaults = Self::default();
        let file = file.unwrap_or_default();

        let service_url = cli_url
            .map(str::to_string)
            .or(env_url)
            .or(file.service_url)
            .unwrap_or(defaults.service_url);

        Self {
            service_url,
            debounce_ms: file.debounce_ms.unwrap_or(defaults.debounce_ms),
            min_autocomplete_len: file
                .min_autocomplete_len
                .unwrap_or(defaults.min_autocomplete_len),
            search_limit: file.search_limit.unwrap_or(defaults.search_limit),
            request_timeout_secs: file
                .request_timeout_secs
                .unwrap_or(defaults.request_timeout_secs),
        }
    }
}

/// Locate the config file for the platform
///
/// Linux checks `~/.config/midicat/config.toml` first, then
/// `/etc/midicat/config.toml`. Other platforms use the OS config
/// directory only.
fn config_file_path() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("midicat").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/midicat/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// Read and parse one TOML config file
fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}
