use exam_core::model::{ExamDefinition, ExamDefinitionError, Question, QuestionId};
use serde::Deserialize;

/// On-disk shape of an exam definition.
///
/// Mirrors the `exam-config.json` layout: camelCase keys, the correct option
/// given as `answer` (or `correctIndex`), and `marks` defaulting to 1.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExamDocument {
    pub title: String,
    pub time_minutes: f64,
    pub questions: Vec<QuestionDocument>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuestionDocument {
    #[serde(default)]
    pub id: Option<IdDocument>,
    pub text: String,
    pub options: Vec<String>,
    #[serde(rename = "answer", alias = "correctIndex")]
    pub correct_index: usize,
    #[serde(default = "default_marks")]
    pub marks: f64,
}

/// Question ids may be written as JSON numbers or strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum IdDocument {
    Number(u64),
    Text(String),
}

impl From<IdDocument> for QuestionId {
    fn from(id: IdDocument) -> Self {
        match id {
            IdDocument::Number(n) => QuestionId::from(n),
            IdDocument::Text(text) => QuestionId::new(text),
        }
    }
}

fn default_marks() -> f64 {
    1.0
}

impl ExamDocument {
    /// Validate the document into a domain `ExamDefinition`.
    ///
    /// Questions without an `id` get their 1-based position.
    pub(crate) fn into_definition(self) -> Result<ExamDefinition, ExamDefinitionError> {
        let questions = self
            .questions
            .into_iter()
            .enumerate()
            .map(|(position, doc)| doc.into_question(position))
            .collect::<Result<Vec<_>, _>>()?;

        ExamDefinition::new(self.title, self.time_minutes, questions)
    }
}

impl QuestionDocument {
    fn into_question(self, position: usize) -> Result<Question, ExamDefinitionError> {
        let id = self.id.map_or_else(
            || QuestionId::from(u64::try_from(position).unwrap_or(u64::MAX).saturating_add(1)),
            Into::into,
        );
        Question::new(id, self.text, self.options, self.correct_index, self.marks)
            .map_err(|source| ExamDefinitionError::Question { position, source })
    }
}
