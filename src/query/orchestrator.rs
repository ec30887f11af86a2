use super::build_prompt;
use crate::{Error, llm::EngineManager, metadata::MetadataExtractor};
use std::{
    path::{Component, Path, PathBuf},
    sync::Arc,
};
use tracing::{debug, error, info, warn};

pub const ENGINE_UNAVAILABLE_MESSAGE: &str =
    "Error: The Language Model is not available. Please check the server logs.";

/// Answers one question about one file under the data root.
pub struct QueryOrchestrator {
    engine: Arc<EngineManager>,
    extractor: MetadataExtractor,
    data_root: PathBuf,
}

impl QueryOrchestrator {
    pub fn new(engine: Arc<EngineManager>, data_root: impl Into<PathBuf>) -> Self {
        Self::with_extractor(engine, data_root, MetadataExtractor::default())
    }

    pub fn with_extractor(
        engine: Arc<EngineManager>,
        data_root: impl Into<PathBuf>,
        extractor: MetadataExtractor,
    ) -> Self {
        Self {
            engine,
            extractor,
            data_root: data_root.into(),
        }
    }

    pub fn engine(&self) -> &EngineManager {
        &self.engine
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    /// Never fails: every problem comes back as a readable message in place
    /// of the answer. Blocks for the whole generation.
    pub fn answer_question(&self, question: &str, relative_file_path: &str) -> String {
        if !self.engine.is_available() {
            error!("LLM not initialized. Cannot process query.");
            return ENGINE_UNAVAILABLE_MESSAGE.to_string();
        }

        let path = resolve_path(&self.data_root, relative_file_path);
        info!("Processing query for file: {}", path.display());

        let report = match self.extractor.extract(&path) {
            Ok(report) => report,
            Err(e) => return describe_failure(&e, &path),
        };

        let prompt = build_prompt(&report.to_string(), question);
        debug!("Generated prompt for LLM:\n{}", prompt);

        match self.engine.invoke(&prompt) {
            Ok(answer) => {
                info!("LLM response: {}", answer);
                answer
            }
            Err(e) => describe_failure(&e, &path),
        }
    }
}

/// Joins `relative_file_path` onto `data_root` after dropping one leading
/// separator. Parent-directory segments are kept as-is, so the result can
/// point outside `data_root`.
pub fn resolve_path(data_root: &Path, relative_file_path: &str) -> PathBuf {
    let relative = relative_file_path
        .strip_prefix(std::path::is_separator)
        .unwrap_or(relative_file_path);

    let resolved = data_root.join(relative);
    if Path::new(relative)
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        warn!(
            "Requested path '{}' contains parent directory segments and may leave the data root",
            relative_file_path
        );
    }
    resolved
}

/// The message returned in place of an answer for `error`.
pub fn describe_failure(error: &Error, path: &Path) -> String {
    match error {
        Error::EngineUnavailable | Error::EngineNotLoaded(_) => {
            ENGINE_UNAVAILABLE_MESSAGE.to_string()
        }
        Error::FileNotFound { path } => {
            format!("Error: File not found at '{}'.", path.display())
        }
        Error::MetadataRead(detail) => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            format!("Error processing file {}: {}", name, detail)
        }
        Error::Inference(detail) => {
            format!("Error processing your question with the LLM: {}", detail)
        }
        other => format!("Error: {}", other),
    }
}
