#![forbid(unsafe_code)]

pub mod json;
pub mod repository;

pub use json::{JsonFileExamSource, parse_exam};
pub use repository::{ExamSource, InMemoryExamSource, StorageError};
