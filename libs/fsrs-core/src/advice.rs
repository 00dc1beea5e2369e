//! Study advice: a display-oriented summary of a card and its four possible outcomes.

use std::fmt;

use chrono::{DateTime, Utc};
use fastrand::Rng;
use serde::{Deserialize, Serialize};

use crate::algorithm::fsrs::Fsrs;
use crate::algorithm::SpacedRepetitionAlgorithm;
use crate::types::{CardState, Rating};

/// Coarse difficulty band shown to learners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLabel {
    Easy,
    Normal,
    Hard,
    #[serde(rename = "very hard")]
    VeryHard,
}

impl DifficultyLabel {
    /// Band a difficulty value: up to 3 easy, up to 5 normal, up to 7 hard.
    pub fn from_difficulty(difficulty: f64) -> Self {
        if difficulty <= 3.0 {
            Self::Easy
        } else if difficulty <= 5.0 {
            Self::Normal
        } else if difficulty <= 7.0 {
            Self::Hard
        } else {
            Self::VeryHard
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
            Self::VeryHard => "very hard",
        }
    }
}

impl fmt::Display for DifficultyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Projected schedule if the card were rated `rating` now.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingForecast {
    pub rating: Rating,
    pub scheduled_days: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,
    /// Rounded to two decimals.
    pub stability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyAdvice {
    pub difficulty_label: DifficultyLabel,
    /// Absent until the card has been reviewed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrievability_percent: Option<u32>,
    pub forecasts: Vec<RatingForecast>,
}

impl Fsrs {
    /// Summarize a card for display, including the outcome of every rating.
    pub fn study_advice(&self, card: &CardState, now: DateTime<Utc>, rng: &mut Rng) -> StudyAdvice {
        let next = self.next_states(card, now, rng);
        let forecasts = next
            .iter()
            .map(|(rating, state)| RatingForecast {
                rating,
                scheduled_days: state.scheduled_days,
                due: state.due,
                stability: round2(state.stability),
            })
            .collect();

        StudyAdvice {
            difficulty_label: DifficultyLabel::from_difficulty(card.difficulty),
            retrievability_percent: card
                .is_reviewed()
                .then(|| (card.retrievability * 100.0).round() as u32),
            forecasts,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
