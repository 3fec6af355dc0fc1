//! Results and review derivation.
//!
//! Both views are computed from session state on demand and never
//! stored.

use std::iter::FusedIterator;

use quizforge_bank::Question;
use serde::{Deserialize, Serialize};

use crate::{AnswerRecord, Player};

/// Shown in place of an answer when the responder chose nothing.
pub const NO_ANSWER: &str = "No Answer";

/// Review color for a question that has no answer record.
pub const NO_ANSWER_COLOR: &str = "gray";

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// One row of the final scoreboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    /// Sorted position, starting at 1. Ties are not compressed.
    pub rank: usize,
    pub player: Player,
    /// The player shares the top score.
    pub is_winner: bool,
}

/// Ranks `players` by score, highest first.
///
/// The sort is stable, so tied players keep their roster order. Every
/// player holding the top score is a winner.
pub fn rank_players(players: &[Player]) -> Vec<Standing> {
    let mut sorted: Vec<&Player> = players.iter().collect();
    sorted.sort_by(|a, b| b.score.cmp(&a.score));
    let top = sorted.first().map(|p| p.score);

    sorted
        .into_iter()
        .enumerate()
        .map(|(i, player)| Standing {
            rank: i + 1,
            is_winner: Some(player.score) == top,
            player: player.clone(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Review
// ---------------------------------------------------------------------------

/// One row of the question review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewEntry {
    /// Zero-based position in the queue.
    pub index: usize,
    pub question: Question,
    /// Text of the correct option (empty if the bank's index is bad).
    pub correct_answer: String,
    /// Text of the chosen option, or [`NO_ANSWER`].
    pub chosen_answer: String,
    /// Responder's color, or [`NO_ANSWER_COLOR`] without a record.
    pub color: String,
    pub is_correct: bool,
}

impl ReviewEntry {
    fn new(index: usize, question: &Question, record: Option<&AnswerRecord>) -> Self {
        let correct = question.correct_answer();
        let chosen = record
            .and_then(|r| r.answer)
            .and_then(|i| question.option(i));
        // Compared by text, so duplicate option texts count as correct.
        let is_correct = matches!((chosen, correct), (Some(c), Some(k)) if c == k);

        Self {
            index,
            question: question.clone(),
            correct_answer: correct.unwrap_or_default().to_string(),
            chosen_answer: chosen.unwrap_or(NO_ANSWER).to_string(),
            color: record.map_or_else(|| NO_ANSWER_COLOR.to_string(), |r| r.color.clone()),
            is_correct,
        }
    }
}

/// Lazy review over a game's questions, paired with their answers.
///
/// Entries are built as they are pulled. A clone taken before iterating,
/// or a fresh `GameSession::review()` call, replays the whole list.
#[derive(Debug, Clone)]
pub struct Review<'a> {
    questions: &'a [Question],
    records: &'a [AnswerRecord],
    next: usize,
}

impl<'a> Review<'a> {
    pub(crate) fn new(questions: &'a [Question], records: &'a [AnswerRecord]) -> Self {
        Self {
            questions,
            records,
            next: 0,
        }
    }
}

impl Iterator for Review<'_> {
    type Item = ReviewEntry;

    fn next(&mut self) -> Option<ReviewEntry> {
        let question = self.questions.get(self.next)?;
        let entry = ReviewEntry::new(self.next, question, self.records.get(self.next));
        self.next += 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.questions.len().saturating_sub(self.next);
        (left, Some(left))
    }
}

impl ExactSizeIterator for Review<'_> {}

impl FusedIterator for Review<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str, score: u32) -> Player {
        Player {
            name: name.into(),
            color: "#000000".into(),
            score,
        }
    }

    fn two_plus_two() -> Question {
        Question::new("2+2?", ["3", "4", "5"], 1)
    }

    fn record(answer: Option<usize>) -> AnswerRecord {
        AnswerRecord {
            player: "Player 1".into(),
            color: "#FF0000".into(),
            answer,
        }
    }

    #[test]
    fn test_tied_winners_keep_roster_order() {
        let standings = rank_players(&[player("A", 10), player("B", 10), player("C", 0)]);
        let order: Vec<(&str, usize, bool)> = standings
            .iter()
            .map(|s| (s.player.name.as_str(), s.rank, s.is_winner))
            .collect();
        assert_eq!(order, [("A", 1, true), ("B", 2, true), ("C", 3, false)]);
    }

    #[test]
    fn test_highest_score_ranks_first() {
        let standings = rank_players(&[player("A", 0), player("B", 20), player("C", 10)]);
        assert_eq!(standings[0].player.name, "B");
        assert!(standings[0].is_winner);
        assert!(!standings[1].is_winner);
        assert_eq!(standings[2].player.name, "A");
    }

    #[test]
    fn test_all_zero_scores_are_all_winners() {
        let standings = rank_players(&[player("A", 0), player("B", 0)]);
        assert!(standings.iter().all(|s| s.is_winner));
    }

    #[test]
    fn test_empty_roster_has_no_standings() {
        assert!(rank_players(&[]).is_empty());
    }

    #[test]
    fn test_review_correct_answer() {
        let entry = ReviewEntry::new(0, &two_plus_two(), Some(&record(Some(1))));
        assert!(entry.is_correct);
        assert_eq!(entry.chosen_answer, "4");
        assert_eq!(entry.correct_answer, "4");
        assert_eq!(entry.color, "#FF0000");
    }

    #[test]
    fn test_review_wrong_answer() {
        let entry = ReviewEntry::new(0, &two_plus_two(), Some(&record(Some(2))));
        assert!(!entry.is_correct);
        assert_eq!(entry.chosen_answer, "5");
    }

    #[test]
    fn test_review_absent_record_is_no_answer() {
        let entry = ReviewEntry::new(0, &two_plus_two(), None);
        assert!(!entry.is_correct);
        assert_eq!(entry.chosen_answer, NO_ANSWER);
        assert_eq!(entry.color, NO_ANSWER_COLOR);
    }

    #[test]
    fn test_review_no_answer_keeps_responder_color() {
        let entry = ReviewEntry::new(0, &two_plus_two(), Some(&record(None)));
        assert!(!entry.is_correct);
        assert_eq!(entry.chosen_answer, NO_ANSWER);
        assert_eq!(entry.color, "#FF0000");
    }

    #[test]
    fn test_review_compares_option_text() {
        let q = Question::new("dup?", ["yes", "yes", "no"], 0);
        let entry = ReviewEntry::new(0, &q, Some(&record(Some(1))));
        assert!(entry.is_correct);
    }

    #[test]
    fn test_review_iterator_is_exact_and_restartable() {
        let questions = [two_plus_two(), Question::new("1+1?", ["2", "3"], 0)];
        let records = [record(Some(1))];
        let review = Review::new(&questions, &records);
        assert_eq!(review.len(), 2);

        let first: Vec<ReviewEntry> = review.clone().collect();
        let second: Vec<ReviewEntry> = review.collect();
        assert_eq!(first, second);
        assert!(first[0].is_correct);
        assert_eq!(first[1].chosen_answer, NO_ANSWER);
        assert_eq!(first[1].color, NO_ANSWER_COLOR);
    }
}
