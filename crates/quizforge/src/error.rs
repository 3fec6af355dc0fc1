//! Unified error type for Quizforge.

use std::path::PathBuf;

use quizforge_bank::BankError;
use quizforge_game::GameError;

/// Top-level error that wraps the per-crate errors.
///
/// The `#[from]` variants let `?` lift bank and game errors into this
/// type without manual mapping.
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    /// The question bank could not be read or parsed.
    #[error(transparent)]
    Bank(#[from] BankError),

    /// The session rejected an intent.
    #[error(transparent)]
    Game(#[from] GameError),

    /// A session config file could not be read or parsed.
    #[error("invalid session config {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    /// The host task has stopped and no longer accepts commands.
    #[error("quiz host is no longer running")]
    Unavailable,
}
