// Client configuration stored in ~/.lumopack/config.toml
//
// Every field is optional in the file; missing ones fall back to defaults
// during the merge.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::merger::PartialConfig;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Environment variable overriding the backend base URL
pub const ENV_API_URL: &str = "LUMOPACK_API_URL";
/// Environment variable overriding the request timeout (seconds)
pub const ENV_TIMEOUT_SECS: &str = "LUMOPACK_TIMEOUT_SECS";

/// Effective client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudioConfig {
    /// Base URL of the quotation backend, without trailing slash
    pub api_base_url: String,
    /// `None` waits indefinitely for the backend
    pub request_timeout_secs: Option<u64>,
    pub user_agent: String,
    /// Number of history entries fetched when resuming a session; `None` fetches all
    pub history_limit: Option<usize>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: None,
            user_agent: format!("lumopack-studio/{}", env!("CARGO_PKG_VERSION")),
            history_limit: None,
        }
    }
}

/// Get the global config file path (~/.lumopack/config.toml)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".lumopack").join("config.toml"))
}

/// Load a config file. A missing file is not an error and yields `None`.
pub fn load_config_file(path: &Path) -> Result<Option<PartialConfig>> {
    if !path.exists() {
        log::debug!("No config file at {}", path.display());
        return Ok(None);
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read config file '{}': {}", path.display(), e))?;

    let config: PartialConfig = toml::from_str(&contents)
        .map_err(|e| anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;

    log::info!("Loaded config from: {}", path.display());
    Ok(Some(config))
}

/// Read overrides from the process environment
pub fn env_overrides() -> Result<PartialConfig> {
    env_overrides_from(|key| std::env::var(key).ok())
}

/// Read overrides through `lookup`, so callers can supply their own environment
pub fn env_overrides_from<F>(lookup: F) -> Result<PartialConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let timeout = match lookup(ENV_TIMEOUT_SECS) {
        Some(raw) => Some(
            raw.trim()
                .parse::<u64>()
                .map_err(|e| anyhow!("Invalid {} '{}': {}", ENV_TIMEOUT_SECS, raw, e))?,
        ),
        None => None,
    };

    Ok(PartialConfig {
        api_base_url: lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()),
        request_timeout_secs: timeout,
        ..Default::default()
    })
}
