mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, path::Path, str::FromStr};
use tracing::debug;

pub const MODEL_PATH_ENV: &str = "LLM_MODEL_PATH";
pub const DATA_ROOT_ENV: &str = "USER_DATA_PATH_IN_CONTAINER";
pub const GPU_LAYERS_ENV: &str = "LLAMA_N_GPU_LAYERS";
pub const CONTEXT_SIZE_ENV: &str = "LLAMA_N_CTX";
pub const MAX_TOKENS_ENV: &str = "LLAMA_MAX_TOKENS";
pub const HOST_ENV: &str = "SERVER_HOST";
pub const PORT_ENV: &str = "SERVER_PORT";

/// Loads the YAML file named by `CONFIG_PATH` (default `config.yaml`) if it
/// exists, then applies environment overrides.
pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

    let config = if Path::new(&config_path).exists() {
        debug!("Loading configuration from: {}", config_path);
        let config_str = tokio::fs::read_to_string(&config_path).await?;
        from_yaml_str(&config_str)?
    } else {
        debug!("No configuration file at {}, using defaults", config_path);
        Config::default()
    };

    let config = apply_overrides(config, |key| env::var(key).ok())?;
    validate(&config)?;

    Ok(config)
}

pub fn from_yaml_str(content: &str) -> Result<Config> {
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

/// Overlays environment-style settings on top of `config`. `lookup` returns
/// the raw value for a variable name, if set.
pub fn apply_overrides<F>(mut config: Config, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = lookup(MODEL_PATH_ENV) {
        config.inference.model_path = path.into();
    }
    if let Some(root) = lookup(DATA_ROOT_ENV) {
        config.server.data_root = root.into();
    }
    if let Some(value) = lookup(GPU_LAYERS_ENV) {
        config.inference.n_gpu_layers = parse_var(GPU_LAYERS_ENV, &value)?;
    }
    if let Some(value) = lookup(CONTEXT_SIZE_ENV) {
        config.inference.n_ctx = parse_var(CONTEXT_SIZE_ENV, &value)?;
    }
    if let Some(value) = lookup(MAX_TOKENS_ENV) {
        config.inference.max_tokens = parse_var(MAX_TOKENS_ENV, &value)?;
    }
    if let Some(host) = lookup(HOST_ENV) {
        config.server.host = host;
    }
    if let Some(value) = lookup(PORT_ENV) {
        config.server.port = parse_var(PORT_ENV, &value)?;
    }
    Ok(config)
}

pub fn validate(config: &Config) -> Result<()> {
    let inference = &config.inference;
    if inference.n_ctx == 0 {
        return Err(Error::config("n_ctx must be a positive number of tokens"));
    }
    if inference.max_tokens == 0 {
        return Err(Error::config("max_tokens must be positive"));
    }
    if !config.server.endpoint.starts_with('/') {
        return Err(Error::config(format!(
            "endpoint must start with '/': {}",
            config.server.endpoint
        )));
    }
    Ok(())
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::config(format!("Invalid value for {}: '{}'", name, value)))
}
