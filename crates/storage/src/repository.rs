use async_trait::async_trait;
use exam_core::model::{ExamDefinition, ExamDefinitionError};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by exam sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("exam definition not found: {0}")]
    NotFound(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid exam definition: {0}")]
    Invalid(#[from] ExamDefinitionError),
}

/// Supplier of exam definitions.
///
/// Implementations hand out validated definitions only; the session layer
/// never sees raw documents.
#[async_trait]
pub trait ExamSource: Send + Sync {
    /// Load the exam definition.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if nothing is available, or other
    /// storage errors if it cannot be read or is invalid.
    async fn load_exam(&self) -> Result<ExamDefinition, StorageError>;
}

/// Simple in-memory source for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryExamSource {
    exam: Arc<Mutex<Option<ExamDefinition>>>,
}

impl InMemoryExamSource {
    #[must_use]
    pub fn new(exam: ExamDefinition) -> Self {
        Self {
            exam: Arc::new(Mutex::new(Some(exam))),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Replace the stored definition.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the lock is poisoned.
    pub fn set(&self, exam: ExamDefinition) -> Result<(), StorageError> {
        let mut guard = self
            .exam
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?;
        *guard = Some(exam);
        Ok(())
    }
}

#[async_trait]
impl ExamSource for InMemoryExamSource {
    async fn load_exam(&self) -> Result<ExamDefinition, StorageError> {
        let guard = self
            .exam
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?;
        guard
            .clone()
            .ok_or_else(|| StorageError::NotFound("in-memory source is empty".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{Question, QuestionId};

    fn build_exam(title: &str) -> ExamDefinition {
        let question = Question::new(
            QuestionId::from(1),
            "2 + 2?",
            vec!["3".into(), "4".into()],
            1,
            1.0,
        )
        .unwrap();
        ExamDefinition::new(title, 5, vec![question]).unwrap()
    }

    #[tokio::test]
    async fn empty_source_reports_not_found() {
        let source = InMemoryExamSource::empty();
        let err = source.load_exam().await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn returns_latest_definition() {
        let source = InMemoryExamSource::new(build_exam("First"));
        assert_eq!(source.load_exam().await.unwrap().title(), "First");

        source.set(build_exam("Second")).unwrap();
        assert_eq!(source.load_exam().await.unwrap().title(), "Second");
    }
}
