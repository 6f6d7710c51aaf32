//! Countdown clock for a timed attempt.
//!
//! `ExamClock` holds no timer of its own. Whatever drives real time (an async
//! interval, a test loop) calls [`ExamClock::tick`] once per elapsed second.

use std::fmt;

use serde::Serialize;

/// Lifecycle of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockState {
    Stopped,
    Running,
    Paused,
    Expired,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The clock was not running; nothing changed.
    Ignored,
    /// One second was consumed and time remains.
    Counted { remaining_secs: u64 },
    /// This tick consumed the last second. Reported exactly once.
    Expired,
}

type ExpiryHook = Box<dyn FnMut() + Send>;

/// One-second resolution countdown with pause/resume.
pub struct ExamClock {
    state: ClockState,
    remaining_secs: u64,
    on_expire: Option<ExpiryHook>,
}

impl ExamClock {
    /// Creates a stopped clock holding `budget_secs`.
    #[must_use]
    pub fn new(budget_secs: u64) -> Self {
        Self {
            state: ClockState::Stopped,
            remaining_secs: budget_secs,
            on_expire: None,
        }
    }

    /// Registers a callback run once, on the tick that expires the clock.
    #[must_use]
    pub fn with_on_expire(mut self, hook: impl FnMut() + Send + 'static) -> Self {
        self.on_expire = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn state(&self) -> ClockState {
        self.state
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    /// `Stopped -> Running`. Returns whether the state changed.
    pub fn start(&mut self) -> bool {
        if self.state == ClockState::Stopped {
            self.state = ClockState::Running;
            true
        } else {
            false
        }
    }

    /// `Running -> Paused`. A no-op in any other state.
    pub fn pause(&mut self) -> bool {
        if self.state == ClockState::Running {
            self.state = ClockState::Paused;
            true
        } else {
            false
        }
    }

    /// `Paused -> Running`, continuing from the exact remaining value.
    pub fn resume(&mut self) -> bool {
        if self.state == ClockState::Paused {
            self.state = ClockState::Running;
            true
        } else {
            false
        }
    }

    /// Halts the countdown. Later ticks are ignored; an expired clock stays expired.
    pub fn stop(&mut self) {
        if self.state != ClockState::Expired {
            self.state = ClockState::Stopped;
        }
    }

    /// Consumes one second if running.
    pub fn tick(&mut self) -> Tick {
        if self.state != ClockState::Running {
            return Tick::Ignored;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return Tick::Counted {
                remaining_secs: self.remaining_secs,
            };
        }

        self.state = ClockState::Expired;
        if let Some(mut hook) = self.on_expire.take() {
            hook();
        }
        Tick::Expired
    }
}

impl fmt::Debug for ExamClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExamClock")
            .field("state", &self.state)
            .field("remaining_secs", &self.remaining_secs)
            .field("has_on_expire", &self.on_expire.is_some())
            .finish()
    }
}
