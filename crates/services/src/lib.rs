#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;
pub mod shuffle;

pub use exam_core::Clock;
pub use sessions as session;

pub use error::SessionError;
pub use shuffle::{ShuffleOptions, Shuffler};

pub use sessions::{
    AttemptSummary, ExamLoopService, ExamSession, GridCell, QuestionView, SessionHandle,
    SessionIntent, SessionProgress, SessionRunner, SessionSnapshot, SessionStatus, SessionTick,
};
