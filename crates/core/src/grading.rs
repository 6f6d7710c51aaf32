//! Pure grading of a finished attempt.

use crate::model::{ExamResult, Question, QuestionOutcome};

/// Grades `answers` against `questions`, index by index.
///
/// A question scores its full marks when the selection equals its correct
/// index and zero otherwise. Unanswered questions score zero. Answers beyond
/// the question list are ignored; missing answers count as unanswered.
#[must_use]
pub fn grade(questions: &[Question], answers: &[Option<usize>]) -> ExamResult {
    let mut score = 0.0;
    let mut max_score = 0.0;
    let mut answered_count = 0;
    let mut per_question = Vec::with_capacity(questions.len());

    for (question_index, question) in questions.iter().enumerate() {
        let selected = answers.get(question_index).copied().flatten();
        if selected.is_some() {
            answered_count += 1;
        }

        let is_correct = selected.is_some_and(|i| question.is_correct(i));
        let marks_awarded = if is_correct { question.marks() } else { 0.0 };
        score += marks_awarded;
        max_score += question.marks();

        per_question.push(QuestionOutcome {
            question_index,
            question_id: question.id().clone(),
            selected,
            is_correct,
            correct_option_text: question.correct_option().to_owned(),
            marks_awarded,
        });
    }

    ExamResult {
        score,
        max_score,
        total_questions: questions.len(),
        answered_count,
        per_question,
    }
}
