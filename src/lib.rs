pub mod config;
pub mod error;
pub mod llm;
pub mod metadata;
pub mod query;
pub mod server;

pub use error::{Error, Result};
