use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;

/// Why an attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitReason {
    /// The candidate submitted.
    Manual,
    /// The countdown reached zero while running.
    Expired,
}

/// Grading record for a single question, in session order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionOutcome {
    pub question_index: usize,
    pub question_id: QuestionId,
    pub selected: Option<usize>,
    pub is_correct: bool,
    pub correct_option_text: String,
    pub marks_awarded: f64,
}

/// Final, immutable scoring summary of an attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExamResult {
    pub score: f64,
    pub max_score: f64,
    pub total_questions: usize,
    pub answered_count: usize,
    pub per_question: Vec<QuestionOutcome>,
}

impl ExamResult {
    /// Number of questions answered correctly.
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.per_question.iter().filter(|o| o.is_correct).count()
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.total_questions.saturating_sub(self.answered_count)
    }

    /// Score as a percentage of the maximum achievable score.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if self.max_score > 0.0 {
            self.score / self.max_score * 100.0
        } else {
            0.0
        }
    }
}
