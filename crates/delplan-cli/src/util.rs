use delplan::Answer;

use crate::error::{CliError, ExitStatus};

#[derive(Clone, Copy, Debug, Default)]
pub struct Verbosity {
    pub json: bool,
    pub verbose: bool,
}

/// How `plan` answers confirmation questions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssumeMode {
    /// Ask on the terminal.
    Ask,
    Yes,
    No,
}

impl AssumeMode {
    pub fn parse(value: &str) -> Result<Self, CliError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ask" => Ok(AssumeMode::Ask),
            "yes" | "y" => Ok(AssumeMode::Yes),
            "no" | "n" => Ok(AssumeMode::No),
            other => Err(CliError::new(
                format!("--assume must be one of ask, yes, no (got '{other}')"),
                ExitStatus::Usage,
            )),
        }
    }

    /// Fixed answer used for every question, if any.
    pub fn fixed_answer(self) -> Option<Answer> {
        match self {
            AssumeMode::Ask => None,
            AssumeMode::Yes => Some(Answer::YesToAll),
            AssumeMode::No => Some(Answer::NoToAll),
        }
    }
}

/// Rejects empty selection handles before they reach the planner.
pub fn validate_handles(handles: &[String]) -> Result<(), CliError> {
    if handles.iter().any(|handle| handle.trim().is_empty()) {
        return Err(CliError::new(
            "selection handles must not be empty",
            ExitStatus::Usage,
        ));
    }
    Ok(())
}
