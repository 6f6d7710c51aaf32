use serde::Serialize;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    /// 1-based position of the current question.
    pub position: usize,
    /// Share of the exam reached by the current position, in percent.
    pub percent: f64,
}

impl SessionProgress {
    #[must_use]
    pub fn new(total: usize, answered: usize, current_index: usize) -> Self {
        let position = if total == 0 { 0 } else { current_index + 1 };
        #[allow(clippy::cast_precision_loss)]
        let percent = if total == 0 {
            0.0
        } else {
            position as f64 / total as f64 * 100.0
        };
        Self {
            total,
            answered,
            position,
            percent,
        }
    }

    #[must_use]
    pub fn unanswered(&self) -> usize {
        self.total.saturating_sub(self.answered)
    }
}
