// Configuration merging with priority

use serde::{Deserialize, Serialize};

use super::loader::StudioConfig;

/// Partial configuration for merging
/// Uses Option<T> for all fields to support partial overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PartialConfig {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub history_limit: Option<usize>,
}

/// Configuration merger
/// Priority order: CLI -> Environment -> File -> Defaults
pub struct ConfigMerger {
    defaults: StudioConfig,
    file: Option<PartialConfig>,
    env: Option<PartialConfig>,
    cli: Option<PartialConfig>,
}

impl ConfigMerger {
    /// Create a new config merger with defaults
    pub fn new() -> Self {
        Self {
            defaults: StudioConfig::default(),
            file: None,
            env: None,
            cli: None,
        }
    }

    /// Set config file values
    pub fn with_file(mut self, config: Option<PartialConfig>) -> Self {
        self.file = config;
        self
    }

    /// Set environment overrides
    pub fn with_env(mut self, config: Option<PartialConfig>) -> Self {
        self.env = config;
        self
    }

    /// Set CLI overrides
    pub fn with_cli(mut self, config: Option<PartialConfig>) -> Self {
        self.cli = config;
        self
    }

    /// Merge all layers with priority
    pub fn merge(&self) -> StudioConfig {
        let mut result = self.defaults.clone();

        for layer in [&self.file, &self.env, &self.cli].into_iter().flatten() {
            result = Self::merge_partial(&result, layer);
        }

        result.api_base_url = result.api_base_url.trim_end_matches('/').to_string();
        result
    }

    fn merge_partial(base: &StudioConfig, partial: &PartialConfig) -> StudioConfig {
        StudioConfig {
            api_base_url: partial
                .api_base_url
                .clone()
                .unwrap_or_else(|| base.api_base_url.clone()),
            request_timeout_secs: partial.request_timeout_secs.or(base.request_timeout_secs),
            user_agent: partial
                .user_agent
                .clone()
                .unwrap_or_else(|| base.user_agent.clone()),
            history_limit: partial.history_limit.or(base.history_limit),
        }
    }
}

impl Default for ConfigMerger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::DEFAULT_API_BASE_URL;

    fn file_config() -> PartialConfig {
        PartialConfig {
            api_base_url: Some("https://file.example".to_string()),
            request_timeout_secs: Some(60),
            history_limit: Some(20),
            ..Default::default()
        }
    }

    #[test]
    fn test_returns_defaults_when_no_configs_exist() {
        let result = ConfigMerger::new().merge();
        assert_eq!(result, StudioConfig::default());
        assert_eq!(result.api_base_url, DEFAULT_API_BASE_URL);
        assert!(result.request_timeout_secs.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let result = ConfigMerger::new().with_file(Some(file_config())).merge();
        assert_eq!(result.api_base_url, "https://file.example");
        assert_eq!(result.request_timeout_secs, Some(60));
        assert_eq!(result.history_limit, Some(20));
    }

    #[test]
    fn test_env_overrides_file() {
        let env = PartialConfig {
            api_base_url: Some("https://env.example".to_string()),
            ..Default::default()
        };
        let result = ConfigMerger::new()
            .with_file(Some(file_config()))
            .with_env(Some(env))
            .merge();

        assert_eq!(result.api_base_url, "https://env.example"); // Env wins
        assert_eq!(result.request_timeout_secs, Some(60)); // File kept
    }

    #[test]
    fn test_cli_overrides_everything() {
        let env = PartialConfig {
            api_base_url: Some("https://env.example".to_string()),
            request_timeout_secs: Some(5),
            ..Default::default()
        };
        let cli = PartialConfig {
            api_base_url: Some("https://cli.example/".to_string()),
            ..Default::default()
        };
        let result = ConfigMerger::new()
            .with_file(Some(file_config()))
            .with_env(Some(env))
            .with_cli(Some(cli))
            .merge();

        assert_eq!(result.api_base_url, "https://cli.example"); // Trailing slash trimmed
        assert_eq!(result.request_timeout_secs, Some(5));
        assert_eq!(result.history_limit, Some(20));
    }
}
