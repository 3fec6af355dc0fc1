//! The question bank: subjects mapped to their questions.

#[cfg(feature = "json")]
use std::io::Read;
#[cfg(feature = "json")]
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[cfg(feature = "json")]
use crate::BankError;
use crate::{Question, Subject};

/// All questions available to a quiz, grouped by subject.
///
/// Subjects keep the order of the source document. That order matters:
/// the pooled [`Subject::Mixed`] pool concatenates subjects in exactly
/// this order before shuffling.
///
/// The JSON form is a single object, one key per subject:
///
/// ```json
/// {
///   "HTML": [{ "question": "...", "options": ["..."], "correct": 0 }],
///   "CSS":  [ ... ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionBank {
    subjects: IndexMap<String, Vec<Question>>,
}

impl QuestionBank {
    /// Creates an empty bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a subject. Builder style.
    pub fn with_subject(
        mut self,
        name: impl Into<String>,
        questions: Vec<Question>,
    ) -> Self {
        self.insert(name, questions);
        self
    }

    /// Adds (or replaces) a subject. A replaced subject keeps its
    /// original position.
    pub fn insert(&mut self, name: impl Into<String>, questions: Vec<Question>) {
        self.subjects.insert(name.into(), questions);
    }

    /// Subject names in bank order.
    pub fn subjects(&self) -> impl Iterator<Item = &str> {
        self.subjects.keys().map(String::as_str)
    }

    /// Questions for one named subject.
    pub fn questions(&self, name: &str) -> Option<&[Question]> {
        self.subjects.get(name).map(Vec::as_slice)
    }

    /// Returns `true` if a round can draw from `subject`.
    /// `Mixed` is always available.
    pub fn contains(&self, subject: &Subject) -> bool {
        match subject {
            Subject::Mixed => true,
            Subject::Named(name) => self.subjects.contains_key(name),
        }
    }

    /// The candidate pool for `subject`, before shuffling.
    ///
    /// `Mixed` concatenates every subject in bank order; a named subject
    /// yields its own sequence. Returns `None` for an unknown subject.
    pub fn pool(&self, subject: &Subject) -> Option<Vec<Question>> {
        match subject {
            Subject::Mixed => Some(self.subjects.values().flatten().cloned().collect()),
            Subject::Named(name) => self.subjects.get(name).cloned(),
        }
    }

    /// Number of subjects.
    pub fn subject_count(&self) -> usize {
        self.subjects.len()
    }

    /// Total number of questions across all subjects.
    pub fn len(&self) -> usize {
        self.subjects.values().map(Vec::len).sum()
    }

    /// Returns `true` if the bank has no questions at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parses a bank from a JSON string.
    ///
    /// # Errors
    /// Returns [`BankError::Parse`] if the document is not a bank.
    #[cfg(feature = "json")]
    pub fn from_json_str(json: &str) -> Result<Self, BankError> {
        let bank: Self = serde_json::from_str(json)?;
        bank.log_loaded();
        Ok(bank)
    }

    /// Parses a bank from raw JSON bytes.
    ///
    /// # Errors
    /// Returns [`BankError::Parse`] if the document is not a bank.
    #[cfg(feature = "json")]
    pub fn from_json_slice(data: &[u8]) -> Result<Self, BankError> {
        let bank: Self = serde_json::from_slice(data)?;
        bank.log_loaded();
        Ok(bank)
    }

    /// Parses a bank from any reader.
    ///
    /// # Errors
    /// Returns [`BankError::Io`] if reading fails, or
    /// [`BankError::Parse`] if the document is not a bank.
    #[cfg(feature = "json")]
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, BankError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_json_slice(&data)
    }

    /// Reads and parses a bank file synchronously.
    ///
    /// Async hosts should read the bytes themselves and call
    /// [`from_json_slice`](Self::from_json_slice).
    ///
    /// # Errors
    /// Same as [`from_reader`](Self::from_reader).
    #[cfg(feature = "json")]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BankError> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_json_slice(&data)
    }

    #[cfg(feature = "json")]
    fn log_loaded(&self) {
        tracing::debug!(
            subjects = self.subject_count(),
            questions = self.len(),
            "question bank loaded"
        );
    }
}
