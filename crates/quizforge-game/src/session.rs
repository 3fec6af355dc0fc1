//! The game session: one quiz, from player setup to review.
//!
//! A `GameSession` owns every piece of mutable game state. It is driven
//! by two kinds of input and answers both with notifications:
//!
//! - intents from the presentation layer ([`GameSession::apply`] or the
//!   individual operations), and
//! - countdown beats from whoever hosts the session ([`GameSession::tick`]).
//!
//! The session never sleeps or spawns. Hosting it on a real clock is the
//! job of the `quizforge` crate.

use std::num::NonZeroU32;

use quizforge_bank::{Question, QuestionBank, Subject};
use quizforge_clock::{Countdown, CountdownStep};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::standings::{rank_players, Review};
use crate::{
    AnswerRecord, GameError, Intent, Notification, Phase, Player, RoundConfig, SessionConfig,
    Standing,
};

/// Shorthand for operation results.
pub type GameResult = Result<Vec<Notification>, GameError>;

/// Read model of a session, for hosts that need to render from scratch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub players: Vec<Player>,
    pub round: RoundConfig,
    pub bank_loaded: bool,
    /// Answers recorded so far.
    pub answered: usize,
    /// Questions in this game's queue.
    pub total_questions: usize,
    pub current_question: Option<Question>,
    pub current_player: Option<Player>,
    /// Units left on the countdown, while one is running.
    pub remaining_time: Option<u32>,
    pub pending_choice: Option<usize>,
}

/// A single quiz game.
///
/// ## Invariants
///
/// - `players.len() <= config.max_players`
/// - `answers.len() <= queue.len()`; the game is over when they match
/// - `turn < players.len()` whenever the roster is non-empty
/// - the countdown runs only while a question is on screen
pub struct GameSession {
    config: SessionConfig,
    bank: Option<QuestionBank>,
    rng: StdRng,
    phase: Phase,
    players: Vec<Player>,
    round: RoundConfig,
    queue: Vec<Question>,
    answers: Vec<AnswerRecord>,
    /// Roster index of the next responder.
    turn: usize,
    /// The option highlighted for the current question.
    pending: Option<usize>,
    countdown: Countdown,
}

impl GameSession {
    /// Creates a session in player setup, without a question bank.
    ///
    /// The config is validated first (see [`SessionConfig::validated`]).
    pub fn new(config: SessionConfig) -> Self {
        let config = config.validated();
        let countdown = Countdown::new(config.answer_time);
        Self {
            config,
            bank: None,
            rng: StdRng::from_os_rng(),
            phase: Phase::PlayerSetup,
            players: Vec::new(),
            round: RoundConfig::default(),
            queue: Vec::new(),
            answers: Vec::new(),
            turn: 0,
            pending: None,
            countdown,
        }
    }

    /// Installs a question bank. Builder style.
    pub fn with_bank(mut self, bank: QuestionBank) -> Self {
        self.bank = Some(bank);
        self
    }

    /// Replaces the shuffle RNG. Builder style.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Seeds the shuffle RNG for reproducible games. Builder style.
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(StdRng::seed_from_u64(seed))
    }

    // -----------------------------------------------------------------------
    // Intent dispatch
    // -----------------------------------------------------------------------

    /// Applies a presentation-layer intent.
    ///
    /// A rejected intent changes nothing and yields no notifications; the
    /// reason is logged at debug level.
    pub fn apply(&mut self, intent: Intent) -> Vec<Notification> {
        let phase = self.phase;
        self.try_apply(intent.clone()).unwrap_or_else(|reason| {
            debug!(?intent, %phase, %reason, "intent rejected");
            Vec::new()
        })
    }

    /// Like [`apply`](Self::apply), but hands back the rejection reason.
    pub fn try_apply(&mut self, intent: Intent) -> GameResult {
        match intent {
            Intent::AddPlayer => self.add_player(),
            Intent::RemovePlayer => self.remove_player(),
            Intent::ProceedToSubjectSelection => self.proceed_to_subject_selection(),
            Intent::SelectSubject(subject) => self.select_subject(subject),
            Intent::SelectDifficulty(n) => self.select_difficulty(n),
            Intent::StartGame => self.start_game(),
            Intent::SelectOption(index) => self.select_option(index),
            Intent::SubmitAnswer => self.submit_answer(),
            Intent::Restart => self.reset_game(),
            Intent::Review => self.open_review(),
            Intent::BackToResults => self.back_to_results(),
        }
    }

    /// Installs (or replaces) the question bank.
    ///
    /// Allowed in any phase; a running game keeps its already-drawn queue.
    pub fn install_bank(&mut self, bank: QuestionBank) -> Vec<Notification> {
        info!(
            subjects = bank.subject_count(),
            questions = bank.len(),
            "question bank installed"
        );
        self.bank = Some(bank);
        if self.phase == Phase::SubjectAndDifficultySelection {
            vec![Notification::StartAllowed(self.start_allowed())]
        } else {
            Vec::new()
        }
    }

    // -----------------------------------------------------------------------
    // Roster
    // -----------------------------------------------------------------------

    /// Appends "Player N" with the next palette color.
    pub fn add_player(&mut self) -> GameResult {
        self.expect_phase(Phase::PlayerSetup)?;
        if self.players.len() >= self.config.max_players {
            return Err(GameError::RosterFull(self.config.max_players));
        }

        let index = self.players.len();
        let player = Player::new(Player::default_name(index), self.config.color_for(index));
        info!(player = %player.name, color = %player.color, "player added");
        self.players.push(player);

        Ok(self.roster_changed())
    }

    /// Removes the most recently added player.
    pub fn remove_player(&mut self) -> GameResult {
        self.expect_phase(Phase::PlayerSetup)?;
        let player = self.players.pop().ok_or(GameError::RosterEmpty)?;
        info!(player = %player.name, "player removed");

        Ok(self.roster_changed())
    }

    /// Moves on to round configuration. Needs at least one player.
    pub fn proceed_to_subject_selection(&mut self) -> GameResult {
        self.expect_phase(Phase::PlayerSetup)?;
        if !self.proceed_allowed() {
            return Err(GameError::RosterEmpty);
        }

        Ok(vec![
            self.transition(Phase::SubjectAndDifficultySelection),
            Notification::StartAllowed(self.start_allowed()),
        ])
    }

    // -----------------------------------------------------------------------
    // Round configuration
    // -----------------------------------------------------------------------

    /// Chooses the subject. May be changed freely before the game starts.
    ///
    /// Unknown subjects are accepted here and rejected by
    /// [`start_game`](Self::start_game), because the bank may not be
    /// loaded yet.
    pub fn select_subject(&mut self, subject: Subject) -> GameResult {
        self.expect_phase(Phase::SubjectAndDifficultySelection)?;
        debug!(%subject, "subject selected");
        self.round.subject = Some(subject);
        Ok(vec![Notification::StartAllowed(self.start_allowed())])
    }

    /// Chooses the difficulty multiplier. Zero is rejected.
    pub fn select_difficulty(&mut self, difficulty: u32) -> GameResult {
        self.expect_phase(Phase::SubjectAndDifficultySelection)?;
        let difficulty = NonZeroU32::new(difficulty).ok_or(GameError::InvalidDifficulty)?;
        debug!(difficulty = difficulty.get(), "difficulty selected");
        self.round.difficulty = Some(difficulty);
        Ok(vec![Notification::StartAllowed(self.start_allowed())])
    }

    // -----------------------------------------------------------------------
    // Play
    // -----------------------------------------------------------------------

    /// Draws the question queue and asks the first question.
    ///
    /// The pool is shuffled uniformly (Fisher-Yates) and the first
    /// `players × difficulty` questions are kept, or the whole pool if it
    /// is smaller.
    pub fn start_game(&mut self) -> GameResult {
        self.expect_phase(Phase::SubjectAndDifficultySelection)?;
        let (Some(subject), Some(_)) = (&self.round.subject, self.round.difficulty) else {
            return Err(GameError::RoundIncomplete);
        };
        if self.players.is_empty() {
            return Err(GameError::RosterEmpty);
        }
        let bank = self.bank.as_ref().ok_or(GameError::BankUnavailable)?;
        let mut pool = bank
            .pool(subject)
            .ok_or_else(|| GameError::UnknownSubject(subject.clone()))?;

        let wanted = self.round.question_count(self.players.len());
        pool.shuffle(&mut self.rng);
        pool.truncate(wanted);

        info!(
            subject = %subject,
            players = self.players.len(),
            wanted,
            drawn = pool.len(),
            "game started"
        );

        self.queue = pool;
        self.answers.clear();
        self.turn = 0;
        self.pending = None;

        let mut notes = vec![self.transition(Phase::Playing)];
        notes.extend(self.emit_question());
        Ok(notes)
    }

    /// Highlights an option on the current question.
    ///
    /// Only the latest selection counts. Nothing advances until
    /// submission.
    pub fn select_option(&mut self, index: usize) -> GameResult {
        self.expect_phase(Phase::Playing)?;
        let count = self
            .current_question()
            .map_or(0, Question::option_count);
        if index >= count {
            return Err(GameError::OptionOutOfRange { index, count });
        }

        trace!(index, "option selected");
        self.pending = Some(index);
        Ok(vec![Notification::SubmitAllowed(true)])
    }

    /// Records the pending choice (or "no answer") for the current
    /// question and moves to the next one.
    pub fn submit_answer(&mut self) -> GameResult {
        self.expect_phase(Phase::Playing)?;
        Ok(self.record_answer())
    }

    /// Advances the answer countdown by one time unit.
    ///
    /// When the countdown runs out the pending choice is submitted, just
    /// as if the responder had pressed submit. Outside of play, or with
    /// no countdown running, this does nothing.
    pub fn tick(&mut self) -> Vec<Notification> {
        if !self.phase.is_playing() {
            return Vec::new();
        }
        match self.countdown.tick() {
            CountdownStep::Idle => Vec::new(),
            CountdownStep::Running { remaining } => {
                trace!(remaining, "countdown tick");
                vec![Notification::TimeRemaining(remaining)]
            }
            CountdownStep::Expired => {
                debug!(
                    question = self.answers.len(),
                    pending = ?self.pending,
                    "answer time expired"
                );
                let mut notes = vec![Notification::TimeRemaining(0)];
                notes.extend(self.record_answer());
                notes
            }
        }
    }

    // -----------------------------------------------------------------------
    // Results, review, restart
    // -----------------------------------------------------------------------

    /// Opens the per-question review.
    pub fn open_review(&mut self) -> GameResult {
        self.expect_phase(Phase::Results)?;
        Ok(vec![
            self.transition(Phase::Review),
            Notification::ReviewReady(self.review().collect()),
        ])
    }

    /// Returns from the review to the scoreboard.
    pub fn back_to_results(&mut self) -> GameResult {
        self.expect_phase(Phase::Review)?;
        Ok(vec![
            self.transition(Phase::Results),
            Notification::ResultsReady(self.results()),
        ])
    }

    /// Starts over with the same roster.
    ///
    /// Scores return to zero; queue, answers and turn are cleared. Names,
    /// colors and order are kept, and so is the round configuration.
    pub fn reset_game(&mut self) -> GameResult {
        self.expect_phase(Phase::Results)?;

        for player in &mut self.players {
            player.score = 0;
        }
        self.queue.clear();
        self.answers.clear();
        self.turn = 0;
        self.pending = None;
        self.countdown.cancel();

        let mut notes = vec![self.transition(Phase::PlayerSetup)];
        notes.extend(self.roster_changed());
        Ok(notes)
    }

    /// The ranked scoreboard. See [`rank_players`].
    pub fn results(&self) -> Vec<Standing> {
        rank_players(&self.players)
    }

    /// Every queued question paired with its answer, computed lazily.
    pub fn review(&self) -> Review<'_> {
        Review::new(&self.queue, &self.answers)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn round(&self) -> &RoundConfig {
        &self.round
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// This game's question queue, in asking order.
    pub fn queue(&self) -> &[Question] {
        &self.queue
    }

    /// Answers recorded so far, in queue order.
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    /// Roster index of the next responder.
    pub fn turn(&self) -> usize {
        self.turn
    }

    pub fn pending_choice(&self) -> Option<usize> {
        self.pending
    }

    pub fn has_bank(&self) -> bool {
        self.bank.is_some()
    }

    /// The question on screen, while playing.
    pub fn current_question(&self) -> Option<&Question> {
        if !self.phase.is_playing() {
            return None;
        }
        self.queue.get(self.answers.len())
    }

    /// The responder for the question on screen, while playing.
    pub fn current_player(&self) -> Option<&Player> {
        if !self.phase.is_playing() {
            return None;
        }
        self.players.get(self.turn)
    }

    /// Units left on the countdown, while one is running.
    pub fn remaining_time(&self) -> Option<u32> {
        self.countdown
            .is_running()
            .then(|| self.countdown.remaining())
    }

    /// Whether the answer countdown is running.
    pub fn timer_running(&self) -> bool {
        self.countdown.is_running()
    }

    /// "Proceed to subject selection" is enabled.
    pub fn proceed_allowed(&self) -> bool {
        !self.players.is_empty()
    }

    /// "Start game" is enabled: subject and difficulty chosen, and a bank
    /// that knows the subject is installed.
    pub fn start_allowed(&self) -> bool {
        let Some(subject) = &self.round.subject else {
            return false;
        };
        self.round.difficulty.is_some()
            && self.bank.as_ref().is_some_and(|bank| bank.contains(subject))
    }

    /// "Submit" is enabled.
    pub fn submit_allowed(&self) -> bool {
        self.phase.is_playing() && self.pending.is_some()
    }

    /// A read model of the whole session.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            players: self.players.clone(),
            round: self.round.clone(),
            bank_loaded: self.has_bank(),
            answered: self.answers.len(),
            total_questions: self.queue.len(),
            current_question: self.current_question().cloned(),
            current_player: self.current_player().cloned(),
            remaining_time: self.remaining_time(),
            pending_choice: self.pending,
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn expect_phase(&self, expected: Phase) -> Result<(), GameError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::InvalidPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn transition(&mut self, to: Phase) -> Notification {
        debug_assert!(
            self.phase.can_transition_to(to),
            "illegal transition {} -> {}",
            self.phase,
            to
        );
        info!(from = %self.phase, %to, "phase changed");
        self.phase = to;
        Notification::PhaseChanged(to)
    }

    fn roster_changed(&self) -> Vec<Notification> {
        vec![
            Notification::PlayersChanged(self.players.clone()),
            Notification::ProceedAllowed(self.proceed_allowed()),
        ]
    }

    /// Puts the next question on screen with a fresh countdown, or ends
    /// the game once every question has an answer.
    fn emit_question(&mut self) -> Vec<Notification> {
        self.countdown.cancel();
        self.pending = None;

        let index = self.answers.len();
        let (Some(question), Some(player)) =
            (self.queue.get(index), self.players.get(self.turn))
        else {
            return self.finish();
        };
        let notes = vec![
            Notification::QuestionChanged {
                index,
                total: self.queue.len(),
                question: question.clone(),
            },
            Notification::TurnChanged {
                player: player.clone(),
                remaining: self.countdown.budget(),
            },
            Notification::SubmitAllowed(false),
        ];

        debug!(index, player = %player.name, "question emitted");
        self.countdown.start();
        notes
    }

    /// Scores and records the current question, then emits the next one.
    fn record_answer(&mut self) -> Vec<Notification> {
        self.countdown.cancel();
        let choice = self.pending.take();
        let index = self.answers.len();
        let points = self.config.points_per_correct;

        let (Some(question), Some(player)) =
            (self.queue.get(index), self.players.get_mut(self.turn))
        else {
            return self.finish();
        };

        let correct = choice.is_some_and(|c| question.is_correct(c));
        if correct {
            player.score = player.score.saturating_add(points);
        }
        let record = AnswerRecord {
            player: player.name.clone(),
            color: player.color.clone(),
            answer: choice,
        };
        debug!(
            index,
            player = %record.player,
            answer = ?record.answer,
            correct,
            score = player.score,
            "answer recorded"
        );

        self.answers.push(record.clone());
        self.turn = (self.turn + 1) % self.players.len();

        let mut notes = vec![Notification::AnswerRecorded { record, correct }];
        if correct {
            notes.push(Notification::PlayersChanged(self.players.clone()));
        }
        notes.extend(self.emit_question());
        notes
    }

    fn finish(&mut self) -> Vec<Notification> {
        self.countdown.cancel();
        self.pending = None;
        let results = self.results();
        info!(
            answered = self.answers.len(),
            winners = results.iter().filter(|s| s.is_winner).count(),
            "game finished"
        );
        vec![
            self.transition(Phase::Results),
            Notification::ResultsReady(results),
        ]
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
