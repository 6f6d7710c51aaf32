use serde::Serialize;

use exam_core::model::{AttemptId, QuestionId};
use exam_core::time::format_mm_ss;

use super::progress::SessionProgress;
use super::service::SessionStatus;

/// The question currently on screen.
///
/// Carries no correctness information.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionView {
    pub index: usize,
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<String>,
    pub marks: f64,
    pub selected: Option<usize>,
}

/// One cell of the question navigation grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridCell {
    pub index: usize,
    pub answered: bool,
    pub current: bool,
}

/// Read-only copy of session state published after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub attempt_id: AttemptId,
    pub title: String,
    pub status: SessionStatus,
    pub current_index: usize,
    pub current_question: Option<QuestionView>,
    pub answers: Vec<Option<usize>>,
    pub remaining_secs: u64,
    pub progress: SessionProgress,
    pub grid: Vec<GridCell>,
}

impl SessionSnapshot {
    /// Remaining time as `MM:SS`.
    #[must_use]
    pub fn remaining_display(&self) -> String {
        format_mm_ss(self.remaining_secs)
    }
}
