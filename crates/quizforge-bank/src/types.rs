//! Core bank types: a single question and the subject selector.
//!
//! These are the structures read from the question file. They are
//! immutable once loaded: the game layer clones them into its queue but
//! never edits them.

use serde::{Deserialize, Serialize};

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Question
// ---------------------------------------------------------------------------

/// One multiple-choice question.
///
/// The JSON shape matches the question file exactly:
///
/// ```json
/// { "question": "2+2?", "options": ["3", "4", "5"], "correct": 1 }
/// ```
///
/// `correct` is an index into `options`. The bank does not check that it
/// is in range; callers use [`Question::correct_answer`], which returns
/// `None` instead of panicking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    prompt: String,
    options: Vec<String>,
    correct: usize,
}

impl Question {
    /// Creates a question from its prompt, options and correct index.
    pub fn new<S: Into<String>>(
        prompt: impl Into<String>,
        options: impl IntoIterator<Item = S>,
        correct: usize,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct,
        }
    }

    /// The question text shown to the responder.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// All answer options, in display order.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// The option text at `index`, if there is one.
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    /// Number of answer options.
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// Index of the correct option.
    pub fn correct_index(&self) -> usize {
        self.correct
    }

    /// Text of the correct option, or `None` if the index is out of range.
    pub fn correct_answer(&self) -> Option<&str> {
        self.option(self.correct)
    }

    /// Returns `true` if `index` is exactly the correct option.
    /// There is no partial credit.
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct
    }
}

// ---------------------------------------------------------------------------
// Subject
// ---------------------------------------------------------------------------

/// Which questions a round draws from.
///
/// Either one named subject from the bank ("HTML", "CSS", ...) or the
/// pooled pseudo-subject [`Subject::Mixed`], which concatenates every
/// subject in bank order.
///
/// Serialized as a plain string: `"Mixed"` maps to `Mixed`, anything
/// else to `Named`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Subject {
    /// A single subject, keyed by its name in the bank.
    Named(String),
    /// Every subject pooled together.
    Mixed,
}

impl Subject {
    /// The name used for the pooled pseudo-subject.
    pub const MIXED: &'static str = "Mixed";

    /// Creates a selector for a named subject.
    ///
    /// Passing `"Mixed"` yields [`Subject::Mixed`].
    pub fn named(name: impl Into<String>) -> Self {
        Self::from(name.into())
    }

    /// The display name of this subject.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Mixed => Self::MIXED,
        }
    }

    /// Returns `true` for the pooled pseudo-subject.
    pub fn is_mixed(&self) -> bool {
        matches!(self, Self::Mixed)
    }
}

impl From<String> for Subject {
    fn from(name: String) -> Self {
        if name == Self::MIXED {
            Self::Mixed
        } else {
            Self::Named(name)
        }
    }
}

impl From<&str> for Subject {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<Subject> for String {
    fn from(subject: Subject) -> Self {
        match subject {
            Subject::Named(name) => name,
            Subject::Mixed => Subject::MIXED.to_string(),
        }
    }
}

impl FromStr for Subject {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
