use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Model not loaded: {0}")]
    EngineNotLoaded(String),

    #[error("The Language Model is not available")]
    EngineUnavailable,

    #[error("File not found at '{}'", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Metadata read error: {0}")]
    MetadataRead(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn engine_not_loaded(msg: impl Into<String>) -> Self {
        Self::EngineNotLoaded(msg.into())
    }

    pub fn metadata(msg: impl Into<String>) -> Self {
        Self::MetadataRead(msg.into())
    }

    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }
}
