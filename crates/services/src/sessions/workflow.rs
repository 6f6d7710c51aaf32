use std::sync::Arc;

use storage::ExamSource;
use tracing::info;

use super::runner::{SessionHandle, SessionRunner};
use super::service::ExamSession;
use crate::Clock;
use crate::error::SessionError;
use crate::shuffle::Shuffler;

/// Orchestrates loading, shuffling and starting an attempt.
#[derive(Clone)]
pub struct ExamLoopService {
    clock: Clock,
    source: Arc<dyn ExamSource>,
    shuffler: Shuffler,
}

impl ExamLoopService {
    #[must_use]
    pub fn new(clock: Clock, source: Arc<dyn ExamSource>) -> Self {
        Self {
            clock,
            source,
            shuffler: Shuffler::new(),
        }
    }

    #[must_use]
    pub fn with_shuffler(mut self, shuffler: Shuffler) -> Self {
        self.shuffler = shuffler;
        self
    }

    /// Load the exam, shuffle it and start a fresh session.
    ///
    /// Each call produces an independent attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the exam cannot be loaded.
    pub async fn start_attempt(&self) -> Result<ExamSession, SessionError> {
        let exam = self.source.load_exam().await?;
        let exam = self.shuffler.shuffle(exam)?;

        let mut session = ExamSession::new(self.clock);
        session.start(exam);
        info!(attempt_id = %session.attempt_id(), "attempt ready");
        Ok(session)
    }

    /// Start an attempt and hand it to a background runner.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the attempt cannot be started.
    pub async fn spawn_attempt(&self) -> Result<SessionHandle, SessionError> {
        Ok(SessionRunner::new(self.start_attempt().await?).spawn())
    }
}
