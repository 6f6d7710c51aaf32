//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::ExamDefinitionError;
use storage::StorageError;

use crate::sessions::SessionStatus;

/// Errors emitted by exam sessions and their runner.
///
/// Index and state violations leave the session exactly as it was.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("index {index} is out of range (len {len})")]
    InvalidIndex { index: usize, len: usize },
    #[error("cannot {operation} while session is {status}")]
    InvalidState {
        operation: &'static str,
        status: SessionStatus,
    },
    #[error("session runner has stopped")]
    Closed,
    #[error(transparent)]
    Definition(#[from] ExamDefinitionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
