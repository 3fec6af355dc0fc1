//! Error types for the bank layer.
//!
//! Each crate in Quizforge defines its own error enum. A `BankError`
//! always means the question data could not be obtained, never that a
//! game rule was broken.

/// Errors that can occur while loading a question bank.
#[derive(Debug, thiserror::Error)]
pub enum BankError {
    /// The source could not be read (missing file, permissions, ...).
    #[error("failed to read question bank: {0}")]
    Io(#[from] std::io::Error),

    /// The source was read but is not a valid bank document.
    ///
    /// Common causes: malformed JSON, a question without `options`, or a
    /// negative `correct` index.
    #[cfg(feature = "json")]
    #[error("failed to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),
}
