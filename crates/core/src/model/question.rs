use serde::Serialize;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question needs at least 2 options, got {len}")]
    TooFewOptions { len: usize },

    #[error("correct index {index} is out of range for {len} options")]
    CorrectIndexOutOfRange { index: usize, len: usize },

    #[error("marks must be positive and finite, got {provided}")]
    InvalidMarks { provided: f64 },

    #[error("option order is not a permutation of 0..{len}")]
    InvalidPermutation { len: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question.
///
/// `correct_index` always points into `options`; every constructor and every
/// reordering keeps that true.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<String>,
    correct_index: usize,
    marks: f64,
}

impl Question {
    /// Creates a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is blank, fewer than two options are
    /// given, the correct index is out of range, or marks are not positive.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
        marks: f64,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions { len: options.len() });
        }
        if correct_index >= options.len() {
            return Err(QuestionError::CorrectIndexOutOfRange {
                index: correct_index,
                len: options.len(),
            });
        }
        if !marks.is_finite() || marks <= 0.0 {
            return Err(QuestionError::InvalidMarks { provided: marks });
        }

        Ok(Self {
            id,
            text,
            options,
            correct_index,
            marks,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }

    #[must_use]
    pub fn marks(&self) -> f64 {
        self.marks
    }

    /// Returns true if `option_index` is the correct answer.
    #[must_use]
    pub fn is_correct(&self, option_index: usize) -> bool {
        option_index == self.correct_index
    }

    /// Reorders options so that position `i` holds the option previously at `order[i]`.
    ///
    /// The correct index follows the original correct option by position, so
    /// options with identical text never confuse the remap.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::InvalidPermutation` if `order` is not a
    /// permutation of `0..option_count()`. The question is left unchanged.
    pub fn reorder_options(&mut self, order: &[usize]) -> Result<(), QuestionError> {
        let len = self.options.len();
        if !is_permutation(order, len) {
            return Err(QuestionError::InvalidPermutation { len });
        }

        let reordered: Vec<String> = order.iter().map(|&i| self.options[i].clone()).collect();
        let correct_index = order
            .iter()
            .position(|&i| i == self.correct_index)
            .ok_or(QuestionError::InvalidPermutation { len })?;

        self.options = reordered;
        self.correct_index = correct_index;
        Ok(())
    }
}

pub(crate) fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &i in order {
        if i >= len || seen[i] {
            return false;
        }
        seen[i] = true;
    }
    true
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
