use std::io::{self, BufRead, Write};

use delplan::{Answer, Prompter, QueryMode, Question};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized answer '{0}'")]
pub struct UnknownAnswer(String);

/// Parses a typed answer. `N` (or `none`) means "no to all", `a` (or `all`) "yes to all".
pub fn parse_answer(input: &str) -> Result<Answer, UnknownAnswer> {
    let trimmed = input.trim();
    match trimmed {
        "N" => return Ok(Answer::NoToAll),
        "A" => return Ok(Answer::YesToAll),
        _ => {}
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "y" | "yes" => Ok(Answer::Yes),
        "n" | "no" => Ok(Answer::No),
        "a" | "all" => Ok(Answer::YesToAll),
        "none" => Ok(Answer::NoToAll),
        "c" | "cancel" => Ok(Answer::Cancel),
        _ => Err(UnknownAnswer(trimmed.to_string())),
    }
}

fn choices(mode: QueryMode) -> &'static str {
    match mode {
        QueryMode::YesNoToAll => "[y]es / [n]o / [a]ll / [N]one / [c]ancel",
        QueryMode::Skip => "[y]es / [n]o (skip) / [a]ll / [N]one",
        QueryMode::AskAlways | QueryMode::GlobalCancel => "[y]es / [n]o",
    }
}

/// Asks questions on stderr and reads answers from stdin. End of input cancels.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&self, question: &Question) -> Answer {
        let stdin = io::stdin();
        let mut stderr = io::stderr();
        loop {
            let _ = write!(
                stderr,
                "{} {} {} ",
                question.subject,
                question.message,
                choices(question.mode)
            );
            let _ = stderr.flush();

            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) | Err(_) => {
                    let _ = writeln!(stderr);
                    return Answer::Cancel;
                }
                Ok(_) => {}
            }
            match parse_answer(&line) {
                Ok(answer) => return answer,
                Err(err) => {
                    let _ = writeln!(stderr, "{err}");
                }
            }
        }
    }
}
