mod orchestrator;
mod prompt;

pub use orchestrator::{
    ENGINE_UNAVAILABLE_MESSAGE, QueryOrchestrator, describe_failure, resolve_path,
};
pub use prompt::build_prompt;
