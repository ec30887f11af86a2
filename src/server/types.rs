use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MAX_FIELD_CHARS: usize = 1000;

/// Body of a chat request. Fields are optional here so missing values are
/// reported per field instead of as a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
}

/// A request that passed field validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidChatRequest {
    pub question: String,
    pub file_path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    pub file_queried: String,
    pub question_asked: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub message: String,
    pub llm_status: LlmStatus,
    pub usage: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LlmStatus {
    Available,
    Unavailable,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type FieldErrors = BTreeMap<String, Vec<String>>;

impl ChatRequest {
    pub fn validate(self) -> Result<ValidChatRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        let question = check_field("question", self.question, &mut errors);
        let file_path = check_field("file_path", self.file_path, &mut errors);

        match (question, file_path) {
            (Some(question), Some(file_path)) if errors.is_empty() => {
                Ok(ValidChatRequest {
                    question,
                    file_path,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Returns the value with surrounding whitespace removed; limits apply to the
/// trimmed value.
fn check_field(name: &str, value: Option<String>, errors: &mut FieldErrors) -> Option<String> {
    let message = match value.as_deref().map(str::trim) {
        None => "This field is required.".to_string(),
        Some("") => "This field may not be blank.".to_string(),
        Some(v) if v.chars().count() > MAX_FIELD_CHARS => format!(
            "Ensure this field has no more than {} characters.",
            MAX_FIELD_CHARS
        ),
        Some(v) => return Some(v.to_string()),
    };
    errors.entry(name.to_string()).or_default().push(message);
    None
}
