use serde::Serialize;
use thiserror::Error;

use crate::model::question::{Question, QuestionError, is_permutation};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ExamDefinitionError {
    #[error("exam title cannot be empty")]
    EmptyTitle,

    #[error("exam time limit must be a positive number of minutes (got {provided})")]
    InvalidTimeMinutes { provided: f64 },

    #[error("exam must contain at least one question")]
    NoQuestions,

    #[error("question order is not a permutation of 0..{len}")]
    InvalidPermutation { len: usize },

    #[error("question position {position} is out of range for {len} questions")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("question {position}: {source}")]
    Question {
        position: usize,
        #[source]
        source: QuestionError,
    },
}

//
// ─── EXAM DEFINITION ───────────────────────────────────────────────────────────
//

/// Declarative description of an exam: title, time budget and ordered questions.
///
/// Construction validates every invariant, so a session never has to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExamDefinition {
    title: String,
    time_minutes: f64,
    #[serde(skip)]
    time_budget_secs: u64,
    questions: Vec<Question>,
}

impl ExamDefinition {
    /// Creates a validated exam definition.
    ///
    /// # Errors
    ///
    /// Returns `ExamDefinitionError` if the title is blank, the time limit is
    /// not a positive finite number of minutes that lasts at least one second
    /// once rounded, or no questions are given.
    pub fn new(
        title: impl Into<String>,
        time_minutes: impl Into<f64>,
        questions: Vec<Question>,
    ) -> Result<Self, ExamDefinitionError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ExamDefinitionError::EmptyTitle);
        }
        let time_minutes = time_minutes.into();
        let time_budget_secs = budget_secs(time_minutes)
            .ok_or(ExamDefinitionError::InvalidTimeMinutes {
                provided: time_minutes,
            })?;
        if questions.is_empty() {
            return Err(ExamDefinitionError::NoQuestions);
        }

        Ok(Self {
            title,
            time_minutes,
            time_budget_secs,
            questions,
        })
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn time_minutes(&self) -> f64 {
        self.time_minutes
    }

    /// Total time budget in seconds, `time_minutes * 60` rounded to the nearest second.
    #[must_use]
    pub fn time_budget_secs(&self) -> u64 {
        self.time_budget_secs
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Sum of marks over all questions.
    #[must_use]
    pub fn max_score(&self) -> f64 {
        self.questions.iter().map(Question::marks).sum()
    }

    /// Consumes the definition, handing out its questions.
    #[must_use]
    pub fn into_questions(self) -> Vec<Question> {
        self.questions
    }

    /// Reorders questions so that position `i` holds the question previously at `order[i]`.
    ///
    /// # Errors
    ///
    /// Returns `ExamDefinitionError::InvalidPermutation` if `order` is not a
    /// permutation of `0..question_count()`.
    pub fn reorder_questions(&mut self, order: &[usize]) -> Result<(), ExamDefinitionError> {
        let len = self.questions.len();
        if !is_permutation(order, len) {
            return Err(ExamDefinitionError::InvalidPermutation { len });
        }

        let mut slots: Vec<Option<Question>> = self.questions.drain(..).map(Some).collect();
        self.questions = order.iter().filter_map(|&i| slots[i].take()).collect();
        Ok(())
    }

    /// Reorders the options of the question at `position`.
    ///
    /// # Errors
    ///
    /// Returns `ExamDefinitionError::PositionOutOfRange` for a bad position and
    /// `ExamDefinitionError::Question` if `order` is not a permutation of that
    /// question's options.
    pub fn reorder_options(
        &mut self,
        position: usize,
        order: &[usize],
    ) -> Result<(), ExamDefinitionError> {
        let len = self.questions.len();
        let question = self
            .questions
            .get_mut(position)
            .ok_or(ExamDefinitionError::PositionOutOfRange { position, len })?;
        question
            .reorder_options(order)
            .map_err(|source| ExamDefinitionError::Question { position, source })
    }
}

/// Whole seconds in `minutes`, or `None` unless that is at least one second.
fn budget_secs(minutes: f64) -> Option<u64> {
    if !minutes.is_finite() || minutes <= 0.0 {
        return None;
    }
    let secs = (minutes * 60.0).round();
    // Saturating float-to-int cast; anything beyond u64 is clamped.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let secs = secs as u64;
    (secs > 0).then_some(secs)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
