use super::types::{
    ChatRequest, ChatResponse, ErrorResponse, HealthResponse, LlmStatus,
};
use crate::query::QueryOrchestrator;
use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{error, info, warn};

pub const SERVICE_UNAVAILABLE_MESSAGE: &str =
    "The Language Model is not available. Please check server configuration and logs.";
pub const USAGE_MESSAGE: &str =
    "Send a POST request to this endpoint with 'question' and 'file_path'.";

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<QueryOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: QueryOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}

pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    if !state.orchestrator.engine().is_available() {
        error!("Chat endpoint: LLM is not available.");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: SERVICE_UNAVAILABLE_MESSAGE.to_string(),
            }),
        )
            .into_response();
    }

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected chat request body: {}", rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: rejection.body_text(),
                }),
            )
                .into_response();
        }
    };

    let request = match request.validate() {
        Ok(request) => request,
        Err(errors) => {
            warn!("Invalid chat request data: {:?}", errors);
            return (StatusCode::BAD_REQUEST, Json(errors)).into_response();
        }
    };

    info!(
        "Received chat request: Question='{}', File='{}'",
        request.question, request.file_path
    );

    // Generation blocks for seconds; keep it off the async workers.
    let orchestrator = state.orchestrator.clone();
    let question = request.question.clone();
    let file_path = request.file_path.clone();
    let answer = match tokio::task::spawn_blocking(move || {
        orchestrator.answer_question(&question, &file_path)
    })
    .await
    {
        Ok(answer) => answer,
        Err(e) => {
            error!("Chat request task failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Processing error: {}", e),
                }),
            )
                .into_response();
        }
    };

    (
        StatusCode::OK,
        Json(ChatResponse {
            answer,
            file_queried: request.file_path,
            question_asked: request.question,
        }),
    )
        .into_response()
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let (message, llm_status) = if state.orchestrator.engine().is_available() {
        (
            "Chatbot API is running. LLM appears to be loaded.",
            LlmStatus::Available,
        )
    } else {
        (
            "LLM is not initialized or failed to load. Check server logs.",
            LlmStatus::Unavailable,
        )
    };

    Json(HealthResponse {
        message: message.to_string(),
        llm_status,
        usage: USAGE_MESSAGE.to_string(),
    })
}
