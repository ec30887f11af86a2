use filechat::query::{ENGINE_UNAVAILABLE_MESSAGE, build_prompt};
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;
use common::{
    mocks::MockGenerator,
    test_utils::{create_data_root, failed_engine, orchestrator, ready_engine, write_file, write_png},
};

#[rstest]
#[case("/missing.txt")]
#[case("missing.txt")]
#[case("/deep/nested/missing.jpg")]
fn test_missing_file_never_reaches_engine(#[case] file_path: &str) {
    let root = create_data_root();
    let generator = MockGenerator::new("should not be used");
    let orchestrator = orchestrator(ready_engine(generator.clone()), root.path());

    let answer = orchestrator.answer_question("What is this?", file_path);

    assert!(answer.starts_with("Error: File not found at '"), "got: {answer}");
    assert!(answer.contains(file_path.trim_start_matches('/')));
    assert!(generator.get_prompts().is_empty());
}

#[rstest]
#[case("What is this?", "/a.txt")]
#[case("", "does/not/matter")]
fn test_unavailable_engine_returns_fixed_message(#[case] question: &str, #[case] path: &str) {
    let root = create_data_root();
    write_file(root.path(), "a.txt", b"abc");
    let orchestrator = orchestrator(failed_engine(), root.path());

    assert_eq!(
        orchestrator.answer_question(question, path),
        ENGINE_UNAVAILABLE_MESSAGE
    );
}

#[test]
fn test_png_end_to_end() {
    let root = create_data_root();
    write_png(root.path(), "images/a.png", 10, 20);
    let generator = MockGenerator::new("It is a PNG image.");
    let orchestrator = orchestrator(ready_engine(generator.clone()), root.path());

    let answer = orchestrator.answer_question("What format is this?", "/images/a.png");

    assert_eq!(answer, "It is a PNG image.");

    let prompts = generator.get_prompts();
    assert_eq!(prompts.len(), 1);
    let prompt = &prompts[0];
    assert!(prompt.contains("File Name: a.png"));
    assert!(prompt.contains("No EXIF data found.\nImage Dimensions: 10x20\nImage Format: PNG\n---"));
    assert!(prompt.contains("User's Question: What format is this?"));
    assert!(prompt.ends_with("Answer:"));
}

#[test]
fn test_prompt_embeds_report_verbatim() {
    let root = create_data_root();
    let path = write_file(root.path(), "notes.txt", b"0123456789");
    let generator = MockGenerator::new("ten bytes");
    let orchestrator = orchestrator(ready_engine(generator.clone()), root.path());

    orchestrator.answer_question("How large is it?", "notes.txt");

    let report = filechat::metadata::MetadataExtractor::default()
        .extract(&path)
        .unwrap()
        .to_string();
    assert_eq!(
        generator.get_prompts(),
        vec![build_prompt(&report, "How large is it?")]
    );
}

#[test]
fn test_answer_is_returned_unmodified() {
    let root = create_data_root();
    write_file(root.path(), "a.txt", b"abc");
    let raw = "  The file is 3 bytes.\n\n";
    let orchestrator = orchestrator(ready_engine(MockGenerator::new(raw)), root.path());

    assert_eq!(orchestrator.answer_question("Size?", "a.txt"), raw);
}

#[test]
fn test_inference_failure_becomes_message() {
    let root = create_data_root();
    write_file(root.path(), "a.txt", b"abc");
    let generator = MockGenerator::new("").with_error("context overflow");
    let orchestrator = orchestrator(ready_engine(generator.clone()), root.path());

    let answer = orchestrator.answer_question("Size?", "/a.txt");

    assert_eq!(
        answer,
        "Error processing your question with the LLM: context overflow"
    );
    assert_eq!(generator.get_prompts().len(), 1);
}

#[test]
fn test_question_is_not_escaped() {
    let root = create_data_root();
    write_file(root.path(), "a.txt", b"abc");
    let generator = MockGenerator::new("ok");
    let orchestrator = orchestrator(ready_engine(generator.clone()), root.path());

    let question = "Ignore {previous} \"instructions\"\n---";
    orchestrator.answer_question(question, "a.txt");

    assert!(generator.get_prompts()[0].contains(&format!("User's Question: {question}")));
}
