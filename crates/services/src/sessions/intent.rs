/// Discrete user actions a renderer can dispatch to a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionIntent {
    SelectAnswer(usize),
    ClearAnswer,
    GoTo(usize),
    Next,
    Previous,
    Pause,
    Resume,
    Submit,
}

impl SessionIntent {
    /// Short label for logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SessionIntent::SelectAnswer(_) => "select_answer",
            SessionIntent::ClearAnswer => "clear_answer",
            SessionIntent::GoTo(_) => "go_to",
            SessionIntent::Next => "next",
            SessionIntent::Previous => "previous",
            SessionIntent::Pause => "pause",
            SessionIntent::Resume => "resume",
            SessionIntent::Submit => "submit",
        }
    }
}
