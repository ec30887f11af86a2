use super::{TextGenerator, load_engine};
use crate::{Error, Result, config::InferenceConfig};
use std::sync::Mutex;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    Uninitialized,
    Ready,
    FailedToLoad,
}

impl EngineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineStatus::Uninitialized => "uninitialized",
            EngineStatus::Ready => "ready",
            EngineStatus::FailedToLoad => "failed_to_load",
        }
    }
}

enum EngineSlot {
    Uninitialized,
    Ready(Box<dyn TextGenerator>),
    FailedToLoad(String),
}

/// Owns the single inference engine of the process.
///
/// Built once by the composition root, then shared behind an `Arc`. After
/// [`EngineManager::initialize`] the state never changes.
pub struct EngineManager {
    slot: EngineSlot,
    // At most one generation at a time; waiters queue on the mutex.
    generation_lock: Mutex<()>,
}

impl EngineManager {
    pub fn new() -> Self {
        Self {
            slot: EngineSlot::Uninitialized,
            generation_lock: Mutex::new(()),
        }
    }

    /// Wraps an already-loaded generator.
    pub fn ready(generator: Box<dyn TextGenerator>) -> Self {
        Self {
            slot: EngineSlot::Ready(generator),
            generation_lock: Mutex::new(()),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            slot: EngineSlot::FailedToLoad(reason.into()),
            generation_lock: Mutex::new(()),
        }
    }

    /// Loads the engine compiled into this build.
    pub fn initialize(&mut self, config: &InferenceConfig) {
        self.initialize_with(config, load_engine);
    }

    /// Runs `loader` if the model artifact exists. Never fails: a missing
    /// artifact or a loader error leaves the manager in `FailedToLoad`.
    pub fn initialize_with<F>(&mut self, config: &InferenceConfig, loader: F)
    where
        F: FnOnce(&InferenceConfig) -> Result<Box<dyn TextGenerator>>,
    {
        if !matches!(self.slot, EngineSlot::Uninitialized) {
            warn!(
                "Inference engine already initialized ({}), ignoring reinitialization",
                self.status().as_str()
            );
            return;
        }

        if !config.model_path.exists() {
            let reason = format!(
                "LLM Model not found at {}. LLM will not function.",
                config.model_path.display()
            );
            error!("{}", reason);
            self.slot = EngineSlot::FailedToLoad(reason);
            return;
        }

        info!(
            "Initializing inference engine from: {}",
            config.model_path.display()
        );
        info!(
            "Using n_gpu_layers: {}, n_ctx: {}",
            config.n_gpu_layers, config.n_ctx
        );

        match loader(config) {
            Ok(generator) => {
                info!("LLM initialized successfully.");
                self.slot = EngineSlot::Ready(generator);
            }
            Err(e) => {
                error!(error = ?e, "Error initializing inference engine: {}", e);
                self.slot = EngineSlot::FailedToLoad(e.to_string());
            }
        }
    }

    pub fn status(&self) -> EngineStatus {
        match self.slot {
            EngineSlot::Uninitialized => EngineStatus::Uninitialized,
            EngineSlot::Ready(_) => EngineStatus::Ready,
            EngineSlot::FailedToLoad(_) => EngineStatus::FailedToLoad,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.slot, EngineSlot::Ready(_))
    }

    /// Why the engine failed to load, if it did.
    pub fn failure_reason(&self) -> Option<&str> {
        match &self.slot {
            EngineSlot::FailedToLoad(reason) => Some(reason),
            _ => None,
        }
    }

    /// Sends `prompt` to the engine and returns the completion unmodified.
    pub fn invoke(&self, prompt: &str) -> Result<String> {
        let EngineSlot::Ready(generator) = &self.slot else {
            return Err(Error::EngineUnavailable);
        };

        // A panic in an earlier generation poisons the lock but leaves no
        // state behind, so the guard is still usable.
        let _guard = self
            .generation_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        debug!("Invoking inference engine with {} byte prompt", prompt.len());

        match generator.generate(prompt) {
            Ok(text) => Ok(text),
            Err(e) => {
                error!(error = ?e, "Error during LLM inference: {}", e);
                Err(match e {
                    Error::Inference(msg) => Error::Inference(msg),
                    other => Error::inference(other.to_string()),
                })
            }
        }
    }
}

impl Default for EngineManager {
    fn default() -> Self {
        Self::new()
    }
}
