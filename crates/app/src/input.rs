use std::fmt;

use services::SessionIntent;

/// A parsed console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Input {
    Intent(SessionIntent),
    Show,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InputError {
    Unknown(String),
    MissingNumber { command: &'static str },
    InvalidNumber { raw: String },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Unknown(raw) => write!(f, "unknown command: {raw} (type `help`)"),
            InputError::MissingNumber { command } => write!(f, "{command} needs a number"),
            InputError::InvalidNumber { raw } => {
                write!(f, "expected a number starting at 1, got {raw}")
            }
        }
    }
}

impl std::error::Error for InputError {}

/// Parse one line of console input.
///
/// Numbers are 1-based as shown on screen; a bare number selects an option.
pub(crate) fn parse(line: &str) -> Result<Input, InputError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Input::Show);
    };
    let arg = words.next();

    let intent = match head.to_ascii_lowercase().as_str() {
        "n" | "next" => SessionIntent::Next,
        "p" | "prev" | "previous" => SessionIntent::Previous,
        "g" | "goto" => SessionIntent::GoTo(number(arg, "goto")?),
        "a" | "answer" => SessionIntent::SelectAnswer(number(arg, "answer")?),
        "c" | "clear" => SessionIntent::ClearAnswer,
        "pause" => SessionIntent::Pause,
        "r" | "resume" => SessionIntent::Resume,
        "s" | "submit" => SessionIntent::Submit,
        "show" => return Ok(Input::Show),
        "h" | "help" | "?" => return Ok(Input::Help),
        other => match other.parse::<usize>() {
            Ok(_) => SessionIntent::SelectAnswer(number(Some(other), "answer")?),
            Err(_) => return Err(InputError::Unknown(head.to_owned())),
        },
    };
    Ok(Input::Intent(intent))
}

fn number(arg: Option<&str>, command: &'static str) -> Result<usize, InputError> {
    let raw = arg.ok_or(InputError::MissingNumber { command })?;
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(InputError::InvalidNumber {
            raw: raw.to_owned(),
        }),
    }
}
