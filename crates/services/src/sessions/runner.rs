use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use super::intent::SessionIntent;
use super::service::{AttemptSummary, ExamSession, SessionStatus, SessionTick};
use super::view::SessionSnapshot;
use crate::error::SessionError;

const TICK_PERIOD: Duration = Duration::from_secs(1);
const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);
const REQUEST_BUFFER: usize = 32;

struct Request {
    intent: SessionIntent,
    reply: oneshot::Sender<Result<(), SessionError>>,
}

/// Drives an [`ExamSession`] in real time on a background task.
///
/// Clock ticks and user intents are handled one at a time by a single loop,
/// so a tick never interleaves with an intent. A fresh snapshot is published
/// after each of them.
#[derive(Debug)]
pub struct SessionRunner {
    session: ExamSession,
    period: Duration,
}

impl SessionRunner {
    #[must_use]
    pub fn new(session: ExamSession) -> Self {
        Self {
            session,
            period: TICK_PERIOD,
        }
    }

    /// Override the real-time length of one countdown second.
    ///
    /// Periods shorter than one millisecond are raised to one millisecond.
    #[must_use]
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.period = period.max(MIN_TICK_PERIOD);
        self
    }

    #[must_use]
    pub fn tick_period(&self) -> Duration {
        self.period
    }

    /// Spawn the runner onto the current tokio runtime.
    #[must_use]
    pub fn spawn(self) -> SessionHandle {
        let (requests_tx, requests_rx) = mpsc::channel(REQUEST_BUFFER);
        let (snapshots_tx, snapshots_rx) = watch::channel(self.session.snapshot());
        let (summary_tx, summary_rx) = oneshot::channel();

        tokio::spawn(self.run(requests_rx, snapshots_tx, summary_tx));

        SessionHandle {
            requests: requests_tx,
            snapshots: snapshots_rx,
            summary: summary_rx,
        }
    }

    async fn run(
        mut self,
        mut requests: mpsc::Receiver<Request>,
        snapshots: watch::Sender<SessionSnapshot>,
        summary_tx: oneshot::Sender<AttemptSummary>,
    ) {
        let mut ticker = time::interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut requests_open = true;

        while !self.session.is_complete() {
            tokio::select! {
                request = requests.recv(), if requests_open => {
                    let Some(Request { intent, reply }) = request else {
                        requests_open = false;
                        continue;
                    };
                    let was_paused = self.session.status() == SessionStatus::Paused;
                    let outcome = self.session.apply(intent);
                    match &outcome {
                        Ok(()) => {
                            // Restart the period so a partial second spent paused is not counted.
                            if was_paused && self.session.is_running() {
                                ticker.reset();
                            }
                        }
                        Err(err) => warn!(intent = intent.name(), error = %err, "intent rejected"),
                    }
                    let _ = reply.send(outcome);
                }
                _ = ticker.tick(), if self.session.is_running() => {
                    if let SessionTick::Counted { remaining_secs } = self.session.tick() {
                        debug!(remaining_secs, "tick");
                    }
                }
                else => break,
            }
            snapshots.send_replace(self.session.snapshot());
        }

        match self.session.summary() {
            Some(summary) => {
                let _ = summary_tx.send(summary.clone());
            }
            None => debug!(
                attempt_id = %self.session.attempt_id(),
                "runner stopped before the attempt completed"
            ),
        }
    }
}

/// Client side of a spawned [`SessionRunner`].
#[derive(Debug)]
pub struct SessionHandle {
    requests: mpsc::Sender<Request>,
    snapshots: watch::Receiver<SessionSnapshot>,
    summary: oneshot::Receiver<AttemptSummary>,
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request").field("intent", &self.intent).finish_non_exhaustive()
    }
}

impl SessionHandle {
    /// Dispatch an intent and wait for it to be applied.
    ///
    /// # Errors
    ///
    /// Returns the session's own error for rejected intents, or
    /// `SessionError::Closed` once the runner has finished.
    pub async fn send(&self, intent: SessionIntent) -> Result<(), SessionError> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(Request { intent, reply })
            .await
            .map_err(|_| SessionError::Closed)?;
        response.await.map_err(|_| SessionError::Closed)?
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Give up control and wait for the attempt to end.
    ///
    /// A running attempt continues until it expires. A paused one can no
    /// longer be resumed, so the runner stops and this returns
    /// `SessionError::Closed`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Closed` if the runner stopped without a summary.
    pub async fn finished(self) -> Result<AttemptSummary, SessionError> {
        let Self {
            requests, summary, ..
        } = self;
        drop(requests);
        summary.await.map_err(|_| SessionError::Closed)
    }

    /// Submit the attempt and return its summary.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Closed` if the runner is gone, or
    /// `SessionError::InvalidState` if the session never started.
    pub async fn submit(self) -> Result<AttemptSummary, SessionError> {
        match self.send(SessionIntent::Submit).await {
            Ok(()) | Err(SessionError::Closed) => {}
            Err(err) => return Err(err),
        }
        self.finished().await
    }
}
