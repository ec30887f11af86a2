use filechat::{
    Error,
    config::InferenceConfig,
    llm::{EngineManager, EngineStatus},
};
use pretty_assertions::assert_eq;
use std::{sync::Arc, thread, time::Duration};
use tempfile::NamedTempFile;

mod common;
use common::mocks::MockGenerator;

#[test]
fn test_initialize_with_missing_artifact() {
    let config = InferenceConfig {
        model_path: "/definitely/not/here.gguf".into(),
        ..InferenceConfig::default()
    };

    let mut engine = EngineManager::new();
    engine.initialize(&config);

    assert_eq!(engine.status(), EngineStatus::FailedToLoad);
    assert!(!engine.is_available());
    assert!(matches!(engine.invoke("hi"), Err(Error::EngineUnavailable)));
}

#[test]
fn test_initialize_with_custom_loader() {
    let artifact = NamedTempFile::new().unwrap();
    let config = InferenceConfig {
        model_path: artifact.path().to_path_buf(),
        ..InferenceConfig::default()
    };
    let generator = MockGenerator::new("loaded");

    let mut engine = EngineManager::new();
    let for_loader = generator.clone();
    engine.initialize_with(&config, move |_| Ok(Box::new(for_loader)));

    assert_eq!(engine.status(), EngineStatus::Ready);
    assert_eq!(engine.invoke("prompt").unwrap(), "loaded");
    assert_eq!(generator.get_prompts(), vec!["prompt".to_string()]);
}

#[test]
fn test_generation_is_serialized() {
    let generator = MockGenerator::new("done").with_delay(Duration::from_millis(20));
    let engine = Arc::new(EngineManager::ready(Box::new(generator.clone())));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let engine = engine.clone();
            thread::spawn(move || engine.invoke(&format!("prompt {i}")))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), "done");
    }

    assert_eq!(generator.get_prompts().len(), 4);
    assert_eq!(generator.max_concurrent(), 1);
}

#[test]
fn test_failed_engine_reports_reason() {
    let engine = EngineManager::failed("weights corrupted");
    assert_eq!(engine.status(), EngineStatus::FailedToLoad);
    assert_eq!(engine.failure_reason(), Some("weights corrupted"));
}
