//! Session configuration and phase state machine.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for a game session.
///
/// Every field has a default, so a partial JSON document such as
/// `{"answer_time": 20}` is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum players in the roster.
    pub max_players: usize,

    /// Player colors, assigned by roster index.
    pub palette: Vec<String>,

    /// Countdown budget per question, in time units.
    pub answer_time: u32,

    /// Score awarded for a correct answer.
    pub points_per_correct: u32,

    /// Wall-clock length of one time unit.
    pub tick_unit: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_players: 4,
            palette: Self::DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            answer_time: 15,
            points_per_correct: 10,
            tick_unit: Duration::from_secs(1),
        }
    }
}

impl SessionConfig {
    /// Red, green, blue, yellow.
    pub const DEFAULT_PALETTE: [&'static str; 4] = ["#FF0000", "#00FF00", "#0000FF", "#FFFF00"];

    /// Fix any out-of-range values so the config is safe to use.
    ///
    /// Called automatically when a session is created. Rules:
    /// - an empty `palette` is replaced by the default palette.
    /// - `max_players` is clamped to `1..=palette.len()` so every player
    ///   gets a distinct color.
    /// - `answer_time` is raised to at least 1.
    pub fn validated(mut self) -> Self {
        if self.palette.is_empty() {
            warn!("palette is empty, using default colors");
            self.palette = Self::default().palette;
        }
        if self.max_players > self.palette.len() {
            warn!(
                max_players = self.max_players,
                colors = self.palette.len(),
                "max_players exceeds palette size, clamping"
            );
            self.max_players = self.palette.len();
        }
        if self.max_players == 0 {
            warn!("max_players is 0, raising to 1");
            self.max_players = 1;
        }
        if self.answer_time == 0 {
            warn!("answer_time is 0, raising to 1");
            self.answer_time = 1;
        }
        self
    }

    /// The color for the player at roster position `index`.
    pub fn color_for(&self, index: usize) -> String {
        if self.palette.is_empty() {
            return String::new();
        }
        self.palette[index % self.palette.len()].clone()
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The coarse-grained stage of a session.
///
/// Transitions move forward, with two exceptions: results and review
/// can switch back and forth, and a restart returns from results to
/// player setup.
///
/// ```text
/// PlayerSetup → SubjectAndDifficultySelection → Playing → Results ⇄ Review
///      ▲                                                    │
///      └──────────────────────── restart ───────────────────┘
/// ```
///
/// - **PlayerSetup**: players are added and removed.
/// - **SubjectAndDifficultySelection**: the round is configured.
/// - **Playing**: questions are asked in turn, each on a countdown.
/// - **Results**: the ranked scoreboard.
/// - **Review**: every question with the answer it received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    PlayerSetup,
    SubjectAndDifficultySelection,
    Playing,
    Results,
    Review,
}

impl Phase {
    /// Returns `true` if moving to `target` is a valid transition.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::PlayerSetup, Self::SubjectAndDifficultySelection)
                | (Self::SubjectAndDifficultySelection, Self::Playing)
                | (Self::Playing, Self::Results)
                | (Self::Results, Self::Review)
                | (Self::Review, Self::Results)
                | (Self::Results, Self::PlayerSetup)
        )
    }

    /// Returns `true` while a question may be on screen.
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Returns `true` once the game is over (results or review).
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Results | Self::Review)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PlayerSetup => write!(f, "PlayerSetup"),
            Self::SubjectAndDifficultySelection => write!(f, "SubjectAndDifficultySelection"),
            Self::Playing => write!(f, "Playing"),
            Self::Results => write!(f, "Results"),
            Self::Review => write!(f, "Review"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Phase; 5] = [
        Phase::PlayerSetup,
        Phase::SubjectAndDifficultySelection,
        Phase::Playing,
        Phase::Results,
        Phase::Review,
    ];

    #[test]
    fn test_phase_forward_transitions() {
        assert!(Phase::PlayerSetup.can_transition_to(Phase::SubjectAndDifficultySelection));
        assert!(Phase::SubjectAndDifficultySelection.can_transition_to(Phase::Playing));
        assert!(Phase::Playing.can_transition_to(Phase::Results));
    }

    #[test]
    fn test_phase_results_review_bidirectional() {
        assert!(Phase::Results.can_transition_to(Phase::Review));
        assert!(Phase::Review.can_transition_to(Phase::Results));
    }

    #[test]
    fn test_phase_restart_only_from_results() {
        assert!(Phase::Results.can_transition_to(Phase::PlayerSetup));
        assert!(!Phase::Review.can_transition_to(Phase::PlayerSetup));
        assert!(!Phase::Playing.can_transition_to(Phase::PlayerSetup));
    }

    #[test]
    fn test_phase_no_skipping_or_self_loops() {
        assert!(!Phase::PlayerSetup.can_transition_to(Phase::Playing));
        assert!(!Phase::SubjectAndDifficultySelection.can_transition_to(Phase::Results));
        assert!(!Phase::Playing.can_transition_to(Phase::Review));
        for phase in ALL {
            assert!(!phase.can_transition_to(phase), "{phase} self-loop");
        }
    }

    #[test]
    fn test_phase_predicates() {
        assert!(Phase::Playing.is_playing());
        assert!(!Phase::Results.is_playing());
        assert!(Phase::Results.is_finished());
        assert!(Phase::Review.is_finished());
        assert!(!Phase::PlayerSetup.is_finished());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::PlayerSetup.to_string(), "PlayerSetup");
        assert_eq!(Phase::Review.to_string(), "Review");
    }

    #[test]
    fn test_session_config_default() {
        let config = SessionConfig::default();
        assert_eq!(config.max_players, 4);
        assert_eq!(config.palette.len(), 4);
        assert_eq!(config.answer_time, 15);
        assert_eq!(config.points_per_correct, 10);
        assert_eq!(config.tick_unit, Duration::from_secs(1));
    }

    #[test]
    fn test_validated_clamps_to_palette() {
        let config = SessionConfig {
            max_players: 9,
            palette: vec!["red".into(), "blue".into()],
            answer_time: 0,
            ..SessionConfig::default()
        }
        .validated();
        assert_eq!(config.max_players, 2);
        assert_eq!(config.answer_time, 1);
    }

    #[test]
    fn test_validated_restores_empty_palette() {
        let config = SessionConfig {
            palette: Vec::new(),
            max_players: 0,
            ..SessionConfig::default()
        }
        .validated();
        assert_eq!(config.palette.len(), 4);
        assert_eq!(config.max_players, 1);
    }

    #[test]
    fn test_color_for_follows_palette() {
        let config = SessionConfig::default();
        assert_eq!(config.color_for(0), "#FF0000");
        assert_eq!(config.color_for(3), "#FFFF00");
    }

    #[test]
    fn test_partial_json_config_uses_defaults() {
        let config: SessionConfig = serde_json::from_str(r#"{"answer_time": 20}"#).unwrap();
        assert_eq!(config.answer_time, 20);
        assert_eq!(config.max_players, 4);
        assert_eq!(config.points_per_correct, 10);
    }
}
