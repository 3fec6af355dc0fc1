//! Question bank for Quizforge.
//!
//! This crate defines the static data a quiz is played with:
//!
//! - **Types** ([`Question`], [`Subject`]): one multiple-choice question,
//!   and the name a player picks to choose which questions are asked.
//! - **Bank** ([`QuestionBank`]): subjects mapped to their questions,
//!   in the order the source document lists them.
//! - **Errors** ([`BankError`]): what can go wrong while loading a bank.
//!
//! # Architecture
//!
//! The bank is loaded once, before any game starts, and never changes
//! afterwards. The game layer only reads from it:
//!
//! ```text
//! questions.json → QuestionBank → GameSession (shuffled queue)
//! ```

mod bank;
mod error;
mod types;

pub use bank::QuestionBank;
pub use error::BankError;
pub use types::{Question, Subject};
