use std::path::{Path, PathBuf};

use async_trait::async_trait;
use exam_core::model::ExamDefinition;
use tracing::debug;

use crate::repository::{ExamSource, StorageError};

mod mapping;

use mapping::ExamDocument;

/// Parse and validate an exam definition from JSON text.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed JSON or missing fields,
/// and `StorageError::Invalid` when the document breaks a domain invariant.
pub fn parse_exam(json: &str) -> Result<ExamDefinition, StorageError> {
    let document: ExamDocument =
        serde_json::from_str(json).map_err(|e| StorageError::Serialization(e.to_string()))?;
    Ok(document.into_definition()?)
}

/// Reads an exam definition from a JSON file on each load.
#[derive(Debug, Clone)]
pub struct JsonFileExamSource {
    path: PathBuf,
}

impl JsonFileExamSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ExamSource for JsonFileExamSource {
    async fn load_exam(&self) -> Result<ExamDefinition, StorageError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    StorageError::NotFound(self.path.display().to_string())
                }
                _ => StorageError::Io(e.to_string()),
            })?;

        let exam = parse_exam(&raw)?;
        debug!(
            path = %self.path.display(),
            title = exam.title(),
            questions = exam.question_count(),
            "loaded exam definition"
        );
        Ok(exam)
    }
}
