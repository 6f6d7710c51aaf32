use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque identifier of a question as supplied by the exam definition.
///
/// Numeric ids are kept in their decimal form, so `7` and `"7"` name the same
/// question.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    /// Creates a new `QuestionId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unique identifier for a single attempt at an exam.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttemptId(Uuid);

impl AttemptId {
    /// Generates a fresh random `AttemptId`
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AttemptId {
    fn default() -> Self {
        Self::generate()
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({:?})", self.0)
    }
}

impl fmt::Debug for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttemptId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

impl FromStr for AttemptId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(AttemptId)
    }
}

// ─── From Implementations ──────────────────────────────────────────────────────

impl From<u64> for QuestionId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_text_ids_share_one_form() {
        assert_eq!(QuestionId::from(42), QuestionId::new("42"));
        assert_eq!(QuestionId::new("q1").as_str(), "q1");
        assert_eq!(QuestionId::new("q1").to_string(), "q1");
    }

    #[test]
    fn question_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&QuestionId::from(7)).unwrap();
        assert_eq!(json, r#""7""#);
        let id: QuestionId = serde_json::from_str(r#""intro-1""#).unwrap();
        assert_eq!(id, QuestionId::new("intro-1"));
    }

    #[test]
    fn attempt_ids_are_unique() {
        let a = AttemptId::generate();
        let b = AttemptId::generate();
        assert_ne!(a, b);
        assert_eq!(a.to_string().parse::<AttemptId>().unwrap(), a);
    }
}
