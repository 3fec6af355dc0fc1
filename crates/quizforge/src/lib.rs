//! # Quizforge
//!
//! Turn-based multiplayer trivia quiz engine.
//!
//! Up to four players share one screen and take turns answering
//! multiple-choice questions against a countdown. The game rules live in
//! [`GameSession`](quizforge_game::GameSession), a synchronous state
//! machine; this crate hosts a session on a Tokio task with a real clock
//! and an asynchronously loaded question bank.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quizforge::prelude::*;
//! use tokio::sync::mpsc;
//!
//! # async fn run() -> Result<(), QuizError> {
//! let (tx, mut notifications) = mpsc::unbounded_channel();
//! let quiz = spawn_host(SessionConfig::default(), tx);
//! quiz.load_bank("questions.json").await?;
//!
//! quiz.send(Intent::AddPlayer).await?;
//! quiz.send(Intent::ProceedToSubjectSelection).await?;
//!
//! while let Some(note) = notifications.recv().await {
//!     println!("{note:?}");
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod host;
mod logging;

pub use config::load_config;
pub use error::QuizError;
pub use host::{COMMAND_CHANNEL_SIZE, NotificationSender, QuizHandle, spawn_host, spawn_session};
pub use logging::{DEFAULT_FILTER, init_tracing};

pub use quizforge_bank as bank;
pub use quizforge_clock as clock;
pub use quizforge_game as game;

/// Everything needed to host and drive a quiz.
pub mod prelude {
    pub use crate::{
        QuizError, QuizHandle, init_tracing, load_config, spawn_host, spawn_session,
    };
    pub use quizforge_bank::{BankError, Question, QuestionBank, Subject};
    pub use quizforge_game::{
        AnswerRecord, GameError, GameSession, Intent, Notification, Phase, Player, ReviewEntry,
        SessionConfig, SessionSnapshot, Standing,
    };
}
