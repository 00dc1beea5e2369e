//! Core types for the scheduler: card lifecycle status, ratings and card state.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ContractError;

/// Card learning status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    New,
    Learning,
    Review,
    Relearning,
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Learning => "learning",
            Self::Review => "review",
            Self::Relearning => "relearning",
        }
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardStatus {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "learning" => Ok(Self::Learning),
            "review" => Ok(Self::Review),
            "relearning" => Ok(Self::Relearning),
            other => Err(ContractError::InvalidStatus(other.to_string())),
        }
    }
}

/// Rating for a review. Ordered from worst to best recall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    /// All ratings in ascending order.
    pub const ALL: [Rating; 4] = [Self::Again, Self::Hard, Self::Good, Self::Easy];

    /// Convert to 4-point numeric value (1-4).
    pub fn to_value(self) -> u8 {
        match self {
            Self::Again => 1,
            Self::Hard => 2,
            Self::Good => 3,
            Self::Easy => 4,
        }
    }

    /// Create from 4-point numeric value.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Again),
            2 => Some(Self::Hard),
            3 => Some(Self::Good),
            4 => Some(Self::Easy),
            _ => None,
        }
    }

    /// Numeric grade as used by the memory model formulas.
    pub(crate) fn grade(self) -> f64 {
        f64::from(self.to_value())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Again => "again",
            Self::Hard => "hard",
            Self::Good => "good",
            Self::Easy => "easy",
        }
    }
}

impl TryFrom<u8> for Rating {
    type Error = ContractError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(value).ok_or_else(|| ContractError::InvalidRating(value.to_string()))
    }
}

impl FromStr for Rating {
    type Err = ContractError;

    /// Accepts either the rating name or its 1-4 value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "again" | "1" => Ok(Self::Again),
            "hard" | "2" => Ok(Self::Hard),
            "good" | "3" => Ok(Self::Good),
            "easy" | "4" => Ok(Self::Easy),
            _ => Err(ContractError::InvalidRating(s.to_string())),
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Memory state of one card for one learner.
///
/// Treated as a value: scheduling returns a new state and never mutates its input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardState {
    /// Intrinsic item difficulty in [1, 10].
    pub difficulty: f64,
    /// Days until recall probability decays to 90%.
    pub stability: f64,
    /// Recall probability computed at the last review of a `review` card.
    pub retrievability: f64,
    pub status: CardStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,
    pub lapses: u32,
    pub reps: u32,
    /// Whole days between the previous due date and the last review.
    pub elapsed_days: u32,
    /// Interval chosen at the last scheduling decision.
    pub scheduled_days: u32,
    /// Opaque tag for external callers; never read by the scheduler.
    #[serde(default)]
    pub seed: i64,
}

impl CardState {
    /// Check the numeric fields are inside their domains.
    pub fn validate(&self) -> Result<(), ContractError> {
        if !(1.0..=10.0).contains(&self.difficulty) {
            return Err(ContractError::Difficulty(self.difficulty));
        }
        if !(self.stability.is_finite() && self.stability > 0.0) {
            return Err(ContractError::Stability(self.stability));
        }
        if !(0.0..=1.0).contains(&self.retrievability) {
            return Err(ContractError::Retrievability(self.retrievability));
        }
        Ok(())
    }

    /// Whether the card has been reviewed at least once.
    pub fn is_reviewed(&self) -> bool {
        self.reps > 0
    }
}
