// Client configuration: defaults, TOML file, environment and CLI layers

pub mod loader;
pub mod merger;

pub use loader::{
    default_config_path, env_overrides, load_config_file, StudioConfig, DEFAULT_API_BASE_URL,
};
pub use merger::{ConfigMerger, PartialConfig};

use anyhow::Result;
use std::path::Path;

/// Resolve the effective configuration.
///
/// `config_path` replaces the default `~/.lumopack/config.toml` location;
/// `cli` holds overrides from command-line flags.
pub fn resolve_config(config_path: Option<&Path>, cli: PartialConfig) -> Result<StudioConfig> {
    let file = match config_path {
        Some(path) => load_config_file(path)?,
        None => match default_config_path() {
            Some(path) => load_config_file(&path)?,
            None => None,
        },
    };

    let config = ConfigMerger::new()
        .with_file(file)
        .with_env(Some(env_overrides()?))
        .with_cli(Some(cli))
        .merge();

    log::debug!("Effective config: {:?}", config);
    Ok(config)
}
