use crate::{Result, config::InferenceConfig};

/// A loaded model that turns one prompt into one complete completion.
///
/// Calls are blocking; the caller decides which thread runs them.
#[cfg_attr(test, mockall::automock)]
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String>;
}

/// Loads the engine compiled into this build.
#[cfg(feature = "llama")]
pub fn load_engine(config: &InferenceConfig) -> Result<Box<dyn TextGenerator>> {
    let engine = super::LlamaEngine::load(config)?;
    Ok(Box::new(engine))
}

#[cfg(not(feature = "llama"))]
pub fn load_engine(config: &InferenceConfig) -> Result<Box<dyn TextGenerator>> {
    Err(crate::Error::engine_not_loaded(format!(
        "built without the `llama` feature, cannot load {}",
        config.model_path.display()
    )))
}
