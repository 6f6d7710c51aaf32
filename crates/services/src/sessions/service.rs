use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

use exam_core::model::{AttemptId, ExamDefinition, ExamResult, Question, SubmitReason};
use exam_core::{Clock, ExamClock, Tick, grade};

use super::intent::SessionIntent;
use super::progress::SessionProgress;
use super::view::{GridCell, QuestionView, SessionSnapshot};
use crate::error::SessionError;

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Where an attempt is in its lifecycle.
///
/// `NotStarted -> InProgress <-> Paused -> Completed`; `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    NotStarted,
    InProgress,
    Paused,
    Completed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionStatus::NotStarted => "not started",
            SessionStatus::InProgress => "in progress",
            SessionStatus::Paused => "paused",
            SessionStatus::Completed => "completed",
        };
        f.write_str(label)
    }
}

/// Outcome of feeding one clock tick to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTick {
    /// The session was not running; nothing changed.
    Ignored,
    Counted { remaining_secs: u64 },
    /// Time ran out and the attempt was submitted.
    Expired,
}

//
// ─── ATTEMPT SUMMARY ───────────────────────────────────────────────────────────
//

/// Everything produced when an attempt ends: the graded result plus attempt metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttemptSummary {
    pub attempt_id: AttemptId,
    pub title: String,
    pub reason: SubmitReason,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub remaining_secs: u64,
    pub result: ExamResult,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state of a single exam attempt.
///
/// All mutation goes through the methods below; each runs to completion and
/// either applies fully or returns an error without touching state.
pub struct ExamSession {
    attempt_id: AttemptId,
    clock: Clock,
    title: String,
    questions: Vec<Question>,
    answers: Vec<Option<usize>>,
    current: usize,
    countdown: ExamClock,
    status: SessionStatus,
    started_at: Option<DateTime<Utc>>,
    summary: Option<AttemptSummary>,
}

impl ExamSession {
    /// Create a session that has not started yet.
    ///
    /// `clock` only stamps start and completion times; remaining time is
    /// driven by [`ExamSession::tick`].
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            attempt_id: AttemptId::generate(),
            clock,
            title: String::new(),
            questions: Vec::new(),
            answers: Vec::new(),
            current: 0,
            countdown: ExamClock::new(0),
            status: SessionStatus::NotStarted,
            started_at: None,
            summary: None,
        }
    }

    /// Load a (shuffled) definition and start the countdown.
    ///
    /// Returns `false` without changing anything if the session was already
    /// started.
    pub fn start(&mut self, exam: ExamDefinition) -> bool {
        if self.status != SessionStatus::NotStarted {
            debug!(attempt_id = %self.attempt_id, status = %self.status, "ignoring repeated start");
            return false;
        }

        let budget = exam.time_budget_secs();
        self.title = exam.title().to_owned();
        self.questions = exam.into_questions();
        self.answers = vec![None; self.questions.len()];
        self.current = 0;
        let attempt_id = self.attempt_id;
        self.countdown = ExamClock::new(budget).with_on_expire(move || {
            info!(%attempt_id, "time expired, submitting");
        });
        self.countdown.start();
        self.status = SessionStatus::InProgress;
        self.started_at = Some(self.clock.now());

        info!(
            attempt_id = %self.attempt_id,
            title = %self.title,
            questions = self.questions.len(),
            remaining_secs = budget,
            "exam attempt started"
        );
        true
    }

    #[must_use]
    pub fn attempt_id(&self) -> AttemptId {
        self.attempt_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u64 {
        self.countdown.remaining_secs()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == SessionStatus::InProgress
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    /// The summary produced at submission, if the attempt has ended.
    #[must_use]
    pub fn summary(&self) -> Option<&AttemptSummary> {
        self.summary.as_ref()
    }

    /// Number of questions with a recorded selection.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress::new(self.questions.len(), self.answered_count(), self.current)
    }

    /// Grade the attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless the session is completed.
    pub fn grade(&self) -> Result<ExamResult, SessionError> {
        self.require(SessionStatus::Completed, "grade")?;
        Ok(grade(&self.questions, &self.answers))
    }

    //
    // ─── ANSWERS ──────────────────────────────────────────────────────────────
    //

    /// Record `option_index` as the answer to the current question, replacing any earlier choice.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless in progress, and
    /// `SessionError::InvalidIndex` if the option does not exist.
    pub fn select_answer(&mut self, option_index: usize) -> Result<(), SessionError> {
        self.require(SessionStatus::InProgress, "select an answer")?;
        let len = self.questions[self.current].option_count();
        if option_index >= len {
            return Err(SessionError::InvalidIndex {
                index: option_index,
                len,
            });
        }

        self.answers[self.current] = Some(option_index);
        debug!(
            attempt_id = %self.attempt_id,
            question = self.current,
            option = option_index,
            "answer selected"
        );
        Ok(())
    }

    /// Unset the answer to the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless in progress.
    pub fn clear_answer(&mut self) -> Result<(), SessionError> {
        self.require(SessionStatus::InProgress, "clear an answer")?;
        self.answers[self.current] = None;
        Ok(())
    }

    //
    // ─── NAVIGATION ───────────────────────────────────────────────────────────
    //

    /// Jump to any question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless in progress, and
    /// `SessionError::InvalidIndex` if there is no such question.
    pub fn go_to(&mut self, index: usize) -> Result<(), SessionError> {
        self.require(SessionStatus::InProgress, "navigate")?;
        let len = self.questions.len();
        if index >= len {
            return Err(SessionError::InvalidIndex { index, len });
        }
        self.current = index;
        Ok(())
    }

    /// Move forward one question; stays put on the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless in progress.
    pub fn next(&mut self) -> Result<(), SessionError> {
        self.require(SessionStatus::InProgress, "navigate")?;
        if self.current + 1 < self.questions.len() {
            self.current += 1;
        }
        Ok(())
    }

    /// Move back one question; stays put on the first one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless in progress.
    pub fn previous(&mut self) -> Result<(), SessionError> {
        self.require(SessionStatus::InProgress, "navigate")?;
        self.current = self.current.saturating_sub(1);
        Ok(())
    }

    //
    // ─── TIMER ────────────────────────────────────────────────────────────────
    //

    /// Pause the countdown. A no-op while already paused.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` before start or after completion.
    pub fn pause(&mut self) -> Result<(), SessionError> {
        match self.status {
            SessionStatus::Paused => Ok(()),
            SessionStatus::InProgress => {
                self.countdown.pause();
                self.status = SessionStatus::Paused;
                info!(attempt_id = %self.attempt_id, remaining_secs = self.remaining_secs(), "exam paused");
                Ok(())
            }
            status => Err(SessionError::InvalidState {
                operation: "pause",
                status,
            }),
        }
    }

    /// Resume the countdown from where it stopped. A no-op while running.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` before start or after completion.
    pub fn resume(&mut self) -> Result<(), SessionError> {
        match self.status {
            SessionStatus::InProgress => Ok(()),
            SessionStatus::Paused => {
                self.countdown.resume();
                self.status = SessionStatus::InProgress;
                info!(attempt_id = %self.attempt_id, remaining_secs = self.remaining_secs(), "exam resumed");
                Ok(())
            }
            status => Err(SessionError::InvalidState {
                operation: "resume",
                status,
            }),
        }
    }

    /// Feed one elapsed second to the countdown.
    ///
    /// Expiry submits the attempt exactly once. Ticks outside `InProgress`
    /// are ignored, so a paused or submitted session never loses time.
    pub fn tick(&mut self) -> SessionTick {
        if self.status != SessionStatus::InProgress {
            return SessionTick::Ignored;
        }

        match self.countdown.tick() {
            Tick::Ignored => SessionTick::Ignored,
            Tick::Counted { remaining_secs } => SessionTick::Counted { remaining_secs },
            Tick::Expired => {
                self.finish(SubmitReason::Expired);
                SessionTick::Expired
            }
        }
    }

    //
    // ─── SUBMISSION ───────────────────────────────────────────────────────────
    //

    /// End the attempt and grade it.
    ///
    /// Calling again after completion returns the same summary.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` if the session never started.
    pub fn submit(&mut self) -> Result<&AttemptSummary, SessionError> {
        match self.status {
            SessionStatus::NotStarted => {
                return Err(SessionError::InvalidState {
                    operation: "submit",
                    status: self.status,
                });
            }
            SessionStatus::InProgress | SessionStatus::Paused => {
                self.finish(SubmitReason::Manual);
            }
            SessionStatus::Completed => {}
        }
        self.summary.as_ref().ok_or(SessionError::InvalidState {
            operation: "submit",
            status: self.status,
        })
    }

    fn finish(&mut self, reason: SubmitReason) {
        self.countdown.stop();
        self.status = SessionStatus::Completed;

        let result = grade(&self.questions, &self.answers);
        let completed_at = self.clock.now();
        info!(
            attempt_id = %self.attempt_id,
            ?reason,
            score = result.score,
            max_score = result.max_score,
            answered = result.answered_count,
            "exam attempt completed"
        );

        self.summary = Some(AttemptSummary {
            attempt_id: self.attempt_id,
            title: self.title.clone(),
            reason,
            started_at: self.started_at.unwrap_or(completed_at),
            completed_at,
            remaining_secs: self.countdown.remaining_secs(),
            result,
        });
    }

    //
    // ─── INTENTS & VIEWS ──────────────────────────────────────────────────────
    //

    /// Dispatch a user intent to the matching operation.
    ///
    /// # Errors
    ///
    /// Propagates the error of the underlying operation.
    pub fn apply(&mut self, intent: SessionIntent) -> Result<(), SessionError> {
        match intent {
            SessionIntent::SelectAnswer(option) => self.select_answer(option),
            SessionIntent::ClearAnswer => self.clear_answer(),
            SessionIntent::GoTo(index) => self.go_to(index),
            SessionIntent::Next => self.next(),
            SessionIntent::Previous => self.previous(),
            SessionIntent::Pause => self.pause(),
            SessionIntent::Resume => self.resume(),
            SessionIntent::Submit => self.submit().map(|_| ()),
        }
    }

    /// Read-only view for renderers.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let current_question = self.current_question().map(|question| QuestionView {
            index: self.current,
            id: question.id().clone(),
            text: question.text().to_owned(),
            options: question.options().to_vec(),
            marks: question.marks(),
            selected: self.answers.get(self.current).copied().flatten(),
        });

        let grid = self
            .answers
            .iter()
            .enumerate()
            .map(|(index, answer)| GridCell {
                index,
                answered: answer.is_some(),
                current: index == self.current,
            })
            .collect();

        SessionSnapshot {
            attempt_id: self.attempt_id,
            title: self.title.clone(),
            status: self.status,
            current_index: self.current,
            current_question,
            answers: self.answers.clone(),
            remaining_secs: self.remaining_secs(),
            progress: self.progress(),
            grid,
        }
    }

    fn require(&self, expected: SessionStatus, operation: &'static str) -> Result<(), SessionError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                operation,
                status: self.status,
            })
        }
    }
}

impl fmt::Debug for ExamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExamSession")
            .field("attempt_id", &self.attempt_id)
            .field("status", &self.status)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("answered", &self.answered_count())
            .field("countdown", &self.countdown)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
