mod intent;
mod progress;
mod runner;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use intent::SessionIntent;
pub use progress::SessionProgress;
pub use runner::{SessionHandle, SessionRunner};
pub use service::{AttemptSummary, ExamSession, SessionStatus, SessionTick};
pub use view::{GridCell, QuestionView, SessionSnapshot};
pub use workflow::ExamLoopService;
