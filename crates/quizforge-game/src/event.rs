//! What the presentation layer sends in, and what it gets back.
//!
//! A session consumes [`Intent`]s (button presses) and answers each with
//! a list of [`Notification`]s describing what changed. The presentation
//! layer renders from notifications alone; it never inspects session
//! internals.

use quizforge_bank::{Question, Subject};
use serde::{Deserialize, Serialize};

use crate::{AnswerRecord, Phase, Player, ReviewEntry, Standing};

/// A user action forwarded by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    AddPlayer,
    RemovePlayer,
    ProceedToSubjectSelection,
    SelectSubject(Subject),
    SelectDifficulty(u32),
    StartGame,
    /// Highlight an answer option for the current question.
    SelectOption(usize),
    SubmitAnswer,
    Restart,
    Review,
    BackToResults,
}

/// A change the presentation layer should render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    /// The session moved to a new phase.
    PhaseChanged(Phase),

    /// Roster snapshot after a join, leave, score change or reset.
    PlayersChanged(Vec<Player>),

    /// Whether "proceed to subject selection" is currently enabled.
    ProceedAllowed(bool),

    /// Whether "start game" is currently enabled.
    StartAllowed(bool),

    /// A new question is on screen.
    QuestionChanged {
        /// Zero-based position in the queue.
        index: usize,
        /// Queue length.
        total: usize,
        question: Question,
    },

    /// A new responder is up, with a fresh countdown.
    TurnChanged { player: Player, remaining: u32 },

    /// One time unit elapsed on the countdown.
    TimeRemaining(u32),

    /// Whether "submit" is currently enabled.
    SubmitAllowed(bool),

    /// An answer was recorded for the previous question.
    AnswerRecorded { record: AnswerRecord, correct: bool },

    /// The final scoreboard.
    ResultsReady(Vec<Standing>),

    /// The per-question review list.
    ReviewReady(Vec<ReviewEntry>),

    /// The question bank could not be loaded; the game cannot start.
    BankUnavailable(String),
}
