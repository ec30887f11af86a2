use filechat::{Error, Result, llm::TextGenerator};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

/// Mock generator that records every prompt it receives
#[derive(Debug, Clone)]
pub struct MockGenerator {
    pub response: String,
    pub error: Option<String>,
    pub prompts: Arc<Mutex<Vec<String>>>,
    pub delay: Option<Duration>,
    active: Arc<AtomicUsize>,
    max_active: Arc<AtomicUsize>,
}

impl MockGenerator {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            error: None,
            prompts: Arc::new(Mutex::new(Vec::new())),
            delay: None,
            active: Arc::new(AtomicUsize::new(0)),
            max_active: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn get_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Highest number of overlapping `generate` calls observed
    pub fn max_concurrent(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

impl TextGenerator for MockGenerator {
    fn generate(&self, prompt: &str) -> Result<String> {
        let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now_active, Ordering::SeqCst);

        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        self.active.fetch_sub(1, Ordering::SeqCst);

        match self.error {
            Some(ref error) => Err(Error::inference(error.clone())),
            None => Ok(self.response.clone()),
        }
    }
}
