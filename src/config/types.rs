use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tokens decoded per llama.cpp batch.
pub const N_BATCH: u32 = 512;

/// Half-precision K/V cache. llama.cpp allocates F16 K/V by default, so the
/// engine sets no cache type of its own.
pub const F16_KV: bool = true;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Settings for the local llama.cpp engine. Read once at startup and never
/// changed afterwards. Batch size and K/V precision are not configurable, see
/// [`N_BATCH`] and [`F16_KV`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InferenceConfig {
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    /// Layers offloaded to the GPU: -1 for all, 0 for CPU only.
    #[serde(default = "default_n_gpu_layers")]
    pub n_gpu_layers: i32,
    #[serde(default = "default_n_ctx")]
    pub n_ctx: u32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_k")]
    pub top_k: i32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_seed")]
    pub seed: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub logs: LogsConfig,
    /// Base directory every requested `file_path` is resolved against.
    #[serde(default = "default_data_root")]
    pub data_root: PathBuf,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            n_gpu_layers: default_n_gpu_layers(),
            n_ctx: default_n_ctx(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_k: default_top_k(),
            top_p: default_top_p(),
            seed: default_seed(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            logs: LogsConfig::default(),
            data_root: default_data_root(),
            endpoint: default_endpoint(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_model_path() -> PathBuf {
    PathBuf::from("/models/llama-2-7b.Q4_0.gguf")
}

fn default_n_gpu_layers() -> i32 {
    -1
}

fn default_n_ctx() -> u32 {
    4096
}

fn default_max_tokens() -> u32 {
    256
}

fn default_temperature() -> f32 {
    0.8
}

fn default_top_k() -> i32 {
    40
}

fn default_top_p() -> f32 {
    0.95
}

fn default_seed() -> u32 {
    1234
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_data_root() -> PathBuf {
    PathBuf::from("/data")
}

fn default_endpoint() -> String {
    "/api/chat".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
