use std::fmt::Write as _;

use exam_core::model::SubmitReason;
use exam_core::time::format_mm_ss;
use services::{AttemptSummary, SessionSnapshot, SessionStatus};

pub(crate) fn help() -> &'static str {
    "commands: <n> | a <n> answer, c clear, n next, p prev, g <n> goto, \
     pause, r resume, s submit, show, help"
}

fn status_label(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::NotStarted => "Not started",
        SessionStatus::InProgress => "In Progress",
        SessionStatus::Paused => "Paused",
        SessionStatus::Completed => "Completed",
    }
}

/// Text view of the current question and the navigation grid.
pub(crate) fn snapshot(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "== {} | {} | {} | question {}/{} ({:.0}%) | {} unanswered",
        snapshot.title,
        status_label(snapshot.status),
        snapshot.remaining_display(),
        snapshot.progress.position,
        snapshot.progress.total,
        snapshot.progress.percent,
        snapshot.progress.unanswered(),
    );

    if let Some(question) = &snapshot.current_question {
        let _ = writeln!(out, "{} [{} mark(s)]", question.text, question.marks);
        for (i, option) in question.options.iter().enumerate() {
            let mark = if question.selected == Some(i) { "(*)" } else { "( )" };
            let _ = writeln!(out, "  {mark} {}. {option}", i + 1);
        }
    }

    let grid: Vec<String> = snapshot
        .grid
        .iter()
        .map(|cell| {
            let flag = match (cell.current, cell.answered) {
                (true, _) => '>',
                (false, true) => '*',
                (false, false) => ' ',
            };
            format!("[{flag}{}]", cell.index + 1)
        })
        .collect();
    let _ = write!(out, "{}", grid.join(" "));
    out
}

/// One-line countdown notice, printed at each full minute and for the last ten seconds.
fn timer_notice(remaining_secs: u64) -> Option<String> {
    if remaining_secs > 0 && (remaining_secs % 60 == 0 || remaining_secs <= 10) {
        Some(format!("[time] {} remaining", format_mm_ss(remaining_secs)))
    } else {
        None
    }
}

/// Remembers the last countdown notice so snapshots published by user
/// actions do not repeat it.
#[derive(Debug, Default)]
pub(crate) struct TimerNotices {
    last_secs: Option<u64>,
}

impl TimerNotices {
    /// The notice for `remaining_secs`, unless it was already printed.
    pub(crate) fn notice_for(&mut self, remaining_secs: u64) -> Option<String> {
        if self.last_secs == Some(remaining_secs) {
            return None;
        }
        let notice = timer_notice(remaining_secs)?;
        self.last_secs = Some(remaining_secs);
        Some(notice)
    }
}

/// Per-question feedback and totals.
pub(crate) fn summary(summary: &AttemptSummary) -> String {
    let result = &summary.result;
    let mut out = String::new();
    let heading = match summary.reason {
        SubmitReason::Manual => "Results",
        SubmitReason::Expired => "Results (time expired)",
    };
    let _ = writeln!(out, "== {heading}: {}", summary.title);

    for outcome in &result.per_question {
        let verdict = if outcome.is_correct { "Correct" } else { "Wrong" };
        let _ = writeln!(
            out,
            "Q{}: {verdict} - answer: {}",
            outcome.question_index + 1,
            outcome.correct_option_text
        );
    }

    let _ = writeln!(out, "Total Questions: {}", result.total_questions);
    let _ = writeln!(
        out,
        "Answered: {} (correct {}, unanswered {})",
        result.answered_count,
        result.correct_count(),
        result.unanswered_count()
    );
    let _ = write!(
        out,
        "Score: {} / {} ({:.1}%)",
        result.score,
        result.max_score,
        result.percentage()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{ExamDefinition, Question, QuestionId};
    use exam_core::time::fixed_clock;
    use services::ExamSession;

    fn session() -> ExamSession {
        let questions = (1..=2)
            .map(|id| {
                Question::new(
                    QuestionId::from(id),
                    format!("Question {id}"),
                    vec!["yes".into(), "no".into()],
                    0,
                    1.0,
                )
                .unwrap()
            })
            .collect();
        let mut session = ExamSession::new(fixed_clock());
        session.start(ExamDefinition::new("Quiz", 1, questions).unwrap());
        session
    }

    #[test]
    fn snapshot_marks_selection_and_grid() {
        let mut session = session();
        session.select_answer(1).unwrap();

        let text = snapshot(&session.snapshot());
        assert!(text.contains("Quiz | In Progress | 01:00 | question 1/2 (50%) | 1 unanswered"));
        assert!(text.contains("(*) 2. no"));
        assert!(text.contains("( ) 1. yes"));
        assert!(text.ends_with("[>1] [ 2]"));
    }

    #[test]
    fn summary_lists_each_question() {
        let mut session = session();
        session.select_answer(0).unwrap();
        let text = summary(session.submit().unwrap());

        assert!(text.contains("Q1: Correct - answer: yes"));
        assert!(text.contains("Q2: Wrong - answer: yes"));
        assert!(text.contains("Answered: 1 (correct 1, unanswered 1)"));
        assert!(text.contains("Score: 1 / 2 (50.0%)"));
    }

    #[test]
    fn timer_notice_only_at_checkpoints() {
        assert_eq!(timer_notice(120).as_deref(), Some("[time] 02:00 remaining"));
        assert_eq!(timer_notice(10).as_deref(), Some("[time] 00:10 remaining"));
        assert_eq!(timer_notice(59), None);
        assert_eq!(timer_notice(0), None);
    }

    #[test]
    fn timer_notices_print_each_checkpoint_once() {
        let mut notices = TimerNotices::default();
        assert!(notices.notice_for(10).is_some());
        // Further snapshots at the same second, e.g. after answering.
        assert_eq!(notices.notice_for(10), None);
        assert_eq!(notices.notice_for(10), None);
        assert!(notices.notice_for(9).is_some());
        assert_eq!(notices.notice_for(59), None);
        assert!(notices.notice_for(60).is_some());
        assert_eq!(notices.notice_for(60), None);
    }
}
