use std::path::PathBuf;

use storage::{ExamSource, JsonFileExamSource, StorageError, parse_exam};

const SAMPLE: &str = r#"{
    "title": "General Knowledge",
    "timeMinutes": 2,
    "questions": [
        { "id": 1, "text": "Capital of France?", "options": ["Paris", "Rome", "Madrid"], "answer": 0, "marks": 1 },
        { "id": 2, "text": "5 * 3?", "options": ["8", "15", "53"], "answer": 1, "marks": 2 }
    ]
}"#;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{name}-{}.json", std::process::id()))
}

#[tokio::test]
async fn loads_definition_from_file() {
    let path = temp_path("exam-source-ok");
    tokio::fs::write(&path, SAMPLE).await.unwrap();

    let source = JsonFileExamSource::new(&path);
    let exam = source.load_exam().await.unwrap();

    assert_eq!(exam.title(), "General Knowledge");
    assert_eq!(exam.question_count(), 2);
    assert_eq!(exam.max_score(), 3.0);

    tokio::fs::remove_file(&path).await.unwrap();
}

#[tokio::test]
async fn missing_file_is_not_found() {
    let source = JsonFileExamSource::new(temp_path("exam-source-missing"));
    let err = source.load_exam().await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound(_)));
}

#[test]
fn malformed_json_is_a_serialization_error() {
    let err = parse_exam("{ \"title\": ").unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));

    let err = parse_exam(r#"{ "title": "No time", "questions": [] }"#).unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}

#[test]
fn string_ids_and_fractional_minutes_load() {
    let exam = parse_exam(r#"{
        "title": "Flexible",
        "timeMinutes": 1.5,
        "questions": [{ "id": "q1", "text": "?", "options": ["a", "b"], "answer": 1 }]
    }"#)
    .unwrap();

    assert_eq!(exam.time_budget_secs(), 90);
    assert_eq!(exam.questions()[0].id().as_str(), "q1");
}

#[test]
fn invariant_violations_are_invalid() {
    let err = parse_exam(r#"{
        "title": "One option",
        "timeMinutes": 1,
        "questions": [{ "text": "?", "options": ["only"], "answer": 0 }]
    }"#)
    .unwrap_err();
    assert!(matches!(err, StorageError::Invalid(_)));
}

#[tokio::test]
async fn bundled_exam_config_is_valid() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../exam-config.json");
    let exam = JsonFileExamSource::new(path).load_exam().await.unwrap();

    assert_eq!(exam.time_budget_secs(), 300);
    assert_eq!(exam.question_count(), 4);
    // The third question omits `marks`.
    assert_eq!(exam.questions()[2].marks(), 1.0);
    assert_eq!(exam.max_score(), 5.0);
}
