//! Roster and round data owned by a session.

use std::num::NonZeroU32;

use quizforge_bank::Subject;
use serde::{Deserialize, Serialize};

/// A registered player.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    /// Display name, assigned at registration ("Player 1", ...).
    pub name: String,
    /// Display color from the session palette.
    pub color: String,
    /// Running score. Only ever increases during a game.
    pub score: u32,
}

impl Player {
    /// Creates a player with a zero score.
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            score: 0,
        }
    }

    /// The default name for the player at roster position `index`.
    pub fn default_name(index: usize) -> String {
        format!("Player {}", index + 1)
    }
}

/// What happened to one question: who answered it and what they chose.
///
/// Recorded exactly once per question, in queue order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// Name of the responder.
    pub player: String,
    /// Responder's color at the time of answering.
    pub color: String,
    /// The chosen option, or `None` for "no answer".
    pub answer: Option<usize>,
}

/// The subject and difficulty chosen for the next game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundConfig {
    pub subject: Option<Subject>,
    pub difficulty: Option<NonZeroU32>,
}

impl RoundConfig {
    /// Both fields set.
    pub fn is_complete(&self) -> bool {
        self.subject.is_some() && self.difficulty.is_some()
    }

    /// Questions to draw for `players` players, before capping at the
    /// pool size. Zero while the difficulty is unset.
    pub fn question_count(&self, players: usize) -> usize {
        self.difficulty
            .map_or(0, |d| players.saturating_mul(d.get() as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_name_is_one_based() {
        assert_eq!(Player::default_name(0), "Player 1");
        assert_eq!(Player::default_name(3), "Player 4");
    }

    #[test]
    fn test_new_player_has_zero_score() {
        let p = Player::new("Player 1", "#FF0000");
        assert_eq!(p.score, 0);
    }

    #[test]
    fn test_round_config_completeness() {
        let mut round = RoundConfig::default();
        assert!(!round.is_complete());
        round.subject = Some(Subject::Mixed);
        assert!(!round.is_complete());
        round.difficulty = NonZeroU32::new(2);
        assert!(round.is_complete());
    }

    #[test]
    fn test_question_count_multiplies() {
        let round = RoundConfig {
            subject: Some(Subject::Mixed),
            difficulty: NonZeroU32::new(3),
        };
        assert_eq!(round.question_count(4), 12);
        assert_eq!(RoundConfig::default().question_count(4), 0);
    }
}
