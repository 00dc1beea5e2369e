//! Spaced repetition algorithm implementations.

pub mod fsrs;

use crate::types::{CardState, Rating};
use chrono::{DateTime, Utc};
use fastrand::Rng;
use serde::Serialize;

/// Projected outcome of a card for each possible rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextStates {
    pub again: CardState,
    pub hard: CardState,
    pub good: CardState,
    pub easy: CardState,
}

impl NextStates {
    pub fn get(&self, rating: Rating) -> &CardState {
        match rating {
            Rating::Again => &self.again,
            Rating::Hard => &self.hard,
            Rating::Good => &self.good,
            Rating::Easy => &self.easy,
        }
    }

    /// Outcomes in ascending rating order.
    pub fn iter(&self) -> impl Iterator<Item = (Rating, &CardState)> {
        Rating::ALL.into_iter().map(move |rating| (rating, self.get(rating)))
    }
}

/// Trait for spaced repetition algorithms.
///
/// `rng` is the only source of nondeterminism; seed it for reproducible schedules.
pub trait SpacedRepetitionAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Initial state for a new card.
    fn init_card(&self, now: DateTime<Utc>) -> CardState;

    /// Calculate next review state after a review.
    ///
    /// Panics on a card that fails [`CardState::validate`].
    fn schedule(
        &self,
        card: &CardState,
        rating: Rating,
        now: DateTime<Utc>,
        rng: &mut Rng,
    ) -> CardState;

    /// Outcome of every rating applied to the same card.
    fn next_states(&self, card: &CardState, now: DateTime<Utc>, rng: &mut Rng) -> NextStates {
        NextStates {
            again: self.schedule(card, Rating::Again, now, rng),
            hard: self.schedule(card, Rating::Hard, now, rng),
            good: self.schedule(card, Rating::Good, now, rng),
            easy: self.schedule(card, Rating::Easy, now, rng),
        }
    }
}
