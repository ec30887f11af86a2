mod generator;
#[cfg(feature = "llama")]
mod llama;
mod manager;

pub use generator::{TextGenerator, load_engine};
#[cfg(feature = "llama")]
pub use llama::LlamaEngine;
pub use manager::{EngineManager, EngineStatus};
