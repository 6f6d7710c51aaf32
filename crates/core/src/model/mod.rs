mod exam;
mod ids;
mod question;
mod result;

pub use ids::{AttemptId, QuestionId};

pub use exam::{ExamDefinition, ExamDefinitionError};
pub use question::{Question, QuestionError};
pub use result::{ExamResult, QuestionOutcome, SubmitReason};
