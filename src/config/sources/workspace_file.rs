//! Workspace config layers under `<workspace>/config/`.

use crate::config::sources::environment::ENV_PREFIX;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_DIR: &str = "config";
const BASE_LAYER: &str = "config";
const DEFAULT_ENV: &str = "development";

/// Deployment environment selecting the second layer, from `GRAPHGEN_ENV`
pub fn environment_name() -> String {
    std::env::var(format!("{}_ENV", ENV_PREFIX))
        .ok()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ENV.to_string())
}

/// Existing layer files in precedence order: `config.toml`, then `{env}.toml`
pub fn layer_paths(workspace_root: &Path, env_name: &str) -> Vec<PathBuf> {
    let config_dir = workspace_root.join(CONFIG_DIR);
    let mut layers = vec![config_dir.join(format!("{}.toml", BASE_LAYER))];
    if env_name != BASE_LAYER {
        layers.push(config_dir.join(format!("{}.toml", env_name)));
    }
    layers.into_iter().filter(|path| path.is_file()).collect()
}

/// Add the workspace layers to the builder; later layers override earlier ones.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let env_name = environment_name();
    let layers = layer_paths(workspace_root, &env_name);
    debug!(env = %env_name, layers = layers.len(), "Workspace configuration layers");
    Ok(layers.into_iter().fold(builder, |builder, path| {
        builder.add_source(File::from(path).required(true))
    }))
}
