//! Game session state machine for Quizforge.
//!
//! One [`GameSession`] is one quiz: a roster of up to four players, a
//! round configuration, a shuffled question queue answered in strict
//! rotation, and the results and review derived from it.
//!
//! # Key types
//!
//! - [`GameSession`]: owns all state; consumes intents and countdown ticks
//! - [`Intent`] / [`Notification`]: the presentation-layer vocabulary
//! - [`Phase`]: lifecycle state machine
//! - [`SessionConfig`]: roster size, palette, answer time, scoring
//! - [`Standing`] / [`ReviewEntry`]: results and review rows

mod config;
mod error;
mod event;
mod session;
mod standings;
mod types;

pub use config::{Phase, SessionConfig};
pub use error::GameError;
pub use event::{Intent, Notification};
pub use session::{GameResult, GameSession, SessionSnapshot};
pub use standings::{rank_players, Review, ReviewEntry, Standing, NO_ANSWER, NO_ANSWER_COLOR};
pub use types::{AnswerRecord, Player, RoundConfig};

pub use quizforge_bank::{Question, QuestionBank, Subject};
