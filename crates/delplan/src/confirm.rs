use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Identifies a kind of question; "to all" answers are remembered per key.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKey {
    FoldersContainingSourceFolders,
    ReferencedArchives,
    ReadOnly,
    Accessors,
    LinkedParent,
    OutOfSync,
}

impl fmt::Display for QuestionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QuestionKey::FoldersContainingSourceFolders => "folders-containing-source-folders",
            QuestionKey::ReferencedArchives => "referenced-archives",
            QuestionKey::ReadOnly => "read-only",
            QuestionKey::Accessors => "accessors",
            QuestionKey::LinkedParent => "linked-parent",
            QuestionKey::OutOfSync => "out-of-sync",
        };
        f.write_str(label)
    }
}

/// How a question may be answered and how long the answer lasts.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    /// The answer applies to this subject only.
    AskAlways,
    /// "Yes to all" / "no to all" are remembered for the rest of the session.
    YesNoToAll,
    /// Declining skips this subject; planning continues.
    Skip,
    /// Declining aborts planning.
    GlobalCancel,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Answer {
    Yes,
    YesToAll,
    No,
    NoToAll,
    Cancel,
}

impl Answer {
    pub fn is_affirmative(self) -> bool {
        matches!(self, Answer::Yes | Answer::YesToAll)
    }
}

/// A question put to the user.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    pub key: QuestionKey,
    pub mode: QueryMode,
    pub subject: String,
    pub message: String,
}

/// The user has cancelled the whole planning operation.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("planning cancelled by user")]
pub struct Cancelled;

/// UI seam answering questions. Implementations may block.
pub trait Prompter: Send + Sync {
    fn ask(&self, question: &Question) -> Answer;
}

/// Always answers the same way.
#[derive(Clone, Copy, Debug)]
pub struct FixedPrompter(pub Answer);

impl Prompter for FixedPrompter {
    fn ask(&self, _question: &Question) -> Answer {
        self.0
    }
}

/// Replays a queue of answers and records every question asked. Once the queue is empty it
/// keeps answering with the fallback.
#[derive(Debug)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<Answer>>,
    fallback: Answer,
    asked: Mutex<Vec<Question>>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self::with_fallback(answers, Answer::No)
    }

    pub fn with_fallback(answers: impl IntoIterator<Item = Answer>, fallback: Answer) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            fallback,
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<Question> {
        self.asked.lock().clone()
    }

    pub fn asked_keys(&self) -> Vec<QuestionKey> {
        self.asked.lock().iter().map(|question| question.key).collect()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&self, question: &Question) -> Answer {
        self.asked.lock().push(question.clone());
        self.answers.lock().pop_front().unwrap_or(self.fallback)
    }
}

/// Decides questions for one planning session, remembering "to all" answers per key.
pub struct ConfirmationOracle<'p> {
    prompter: &'p dyn Prompter,
    memo: BTreeMap<QuestionKey, bool>,
}

impl<'p> ConfirmationOracle<'p> {
    pub fn new(prompter: &'p dyn Prompter) -> Self {
        Self {
            prompter,
            memo: BTreeMap::new(),
        }
    }

    /// Pre-seeds the decision for a question key, as if the user had answered "to all".
    pub fn remember(&mut self, key: QuestionKey, decision: bool) {
        self.memo.insert(key, decision);
    }

    pub fn remembered(&self, key: QuestionKey) -> Option<bool> {
        self.memo.get(&key).copied()
    }

    pub fn reset(&mut self) {
        self.memo.clear();
    }

    /// Returns whether the subject is confirmed. Only [`QueryMode::GlobalCancel`] can fail.
    pub fn confirm(
        &mut self,
        mode: QueryMode,
        key: QuestionKey,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<bool, Cancelled> {
        let remembers = matches!(mode, QueryMode::YesNoToAll | QueryMode::Skip);
        if remembers {
            if let Some(decision) = self.memo.get(&key).copied() {
                debug!(%key, decision, "reusing remembered answer");
                return Ok(decision);
            }
        }

        let question = Question {
            key,
            mode,
            subject: subject.into(),
            message: message.into(),
        };
        let answer = self.prompter.ask(&question);
        debug!(%key, subject = %question.subject, ?answer, ?mode, "confirmation answered");

        if remembers {
            match answer {
                Answer::YesToAll => {
                    self.memo.insert(key, true);
                }
                Answer::NoToAll => {
                    self.memo.insert(key, false);
                }
                _ => {}
            }
        }

        if mode == QueryMode::GlobalCancel && !answer.is_affirmative() {
            return Err(Cancelled);
        }
        Ok(answer.is_affirmative())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_to_all_is_reused_for_the_same_key() {
        let prompter = ScriptedPrompter::new([Answer::YesToAll]);
        let mut oracle = ConfirmationOracle::new(&prompter);

        assert_eq!(
            oracle.confirm(QueryMode::YesNoToAll, QuestionKey::Accessors, "a", "?"),
            Ok(true)
        );
        assert_eq!(
            oracle.confirm(QueryMode::YesNoToAll, QuestionKey::Accessors, "b", "?"),
            Ok(true)
        );
        assert_eq!(prompter.asked().len(), 1);
    }

    #[test]
    fn memo_is_scoped_per_key_and_resettable() {
        let prompter = ScriptedPrompter::new([Answer::NoToAll, Answer::Yes, Answer::Yes]);
        let mut oracle = ConfirmationOracle::new(&prompter);

        assert_eq!(
            oracle.confirm(QueryMode::YesNoToAll, QuestionKey::Accessors, "a", "?"),
            Ok(false)
        );
        assert_eq!(
            oracle.confirm(QueryMode::YesNoToAll, QuestionKey::ReferencedArchives, "b", "?"),
            Ok(true)
        );
        assert_eq!(oracle.remembered(QuestionKey::Accessors), Some(false));

        oracle.reset();
        assert_eq!(
            oracle.confirm(QueryMode::YesNoToAll, QuestionKey::Accessors, "c", "?"),
            Ok(true)
        );
        assert_eq!(prompter.asked().len(), 3);
    }

    #[test]
    fn ask_always_ignores_the_memo() {
        let prompter = ScriptedPrompter::new([Answer::No]);
        let mut oracle = ConfirmationOracle::new(&prompter);
        oracle.remember(QuestionKey::LinkedParent, true);

        assert_eq!(
            oracle.confirm(QueryMode::AskAlways, QuestionKey::LinkedParent, "q", "?"),
            Ok(false)
        );
        assert_eq!(prompter.asked_keys(), vec![QuestionKey::LinkedParent]);
    }

    #[test]
    fn skip_treats_cancel_as_a_local_decline() {
        let prompter = FixedPrompter(Answer::Cancel);
        let mut oracle = ConfirmationOracle::new(&prompter);
        assert_eq!(
            oracle.confirm(QueryMode::Skip, QuestionKey::OutOfSync, "x", "?"),
            Ok(false)
        );
    }

    #[test]
    fn global_cancel_fails_on_any_decline() {
        for answer in [Answer::No, Answer::NoToAll, Answer::Cancel] {
            let prompter = FixedPrompter(answer);
            let mut oracle = ConfirmationOracle::new(&prompter);
            assert_eq!(
                oracle.confirm(QueryMode::GlobalCancel, QuestionKey::ReadOnly, "x", "?"),
                Err(Cancelled)
            );
        }
        let prompter = FixedPrompter(Answer::Yes);
        let mut oracle = ConfirmationOracle::new(&prompter);
        assert_eq!(
            oracle.confirm(QueryMode::GlobalCancel, QuestionKey::ReadOnly, "x", "?"),
            Ok(true)
        );
    }
}
