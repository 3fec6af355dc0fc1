//! Error types for the game layer.
//!
//! A `GameError` explains why an operation was rejected. Rejection never
//! changes session state: every operation checks its preconditions
//! before touching anything.

use quizforge_bank::Subject;

use crate::Phase;

/// Why a session operation was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// The session is in a phase that doesn't allow this operation.
    /// For example, selecting an answer during player setup.
    #[error("not allowed in phase {actual} (requires {expected})")]
    InvalidPhase { expected: Phase, actual: Phase },

    /// The roster already holds the maximum number of players.
    #[error("roster is full ({0} players)")]
    RosterFull(usize),

    /// There is no player to remove, or no player to play with.
    #[error("roster is empty")]
    RosterEmpty,

    /// Subject or difficulty has not been chosen yet.
    #[error("round needs both a subject and a difficulty")]
    RoundIncomplete,

    /// Difficulty must be a positive multiplier.
    #[error("difficulty must be positive")]
    InvalidDifficulty,

    /// No question bank has been installed.
    #[error("question bank not loaded")]
    BankUnavailable,

    /// The chosen subject does not exist in the bank.
    #[error("unknown subject {0}")]
    UnknownSubject(Subject),

    /// The selected option does not exist on the current question.
    #[error("option {index} out of range ({count} options)")]
    OptionOutOfRange { index: usize, count: usize },
}
