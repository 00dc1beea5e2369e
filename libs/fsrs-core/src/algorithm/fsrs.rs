//! FSRS (Free Spaced Repetition Scheduler) algorithm.
//!
//! Memory model with three variables:
//! - Difficulty (D): Card difficulty 1-10
//! - Stability (S): Days until retention drops to 90%
//! - Retrievability (R): Probability of recall

use super::SpacedRepetitionAlgorithm;
use crate::params::SchedulerParams;
use crate::types::{CardState, CardStatus, Rating};
use chrono::{DateTime, Duration, Utc};
use fastrand::Rng;

/// Lower bound for every stability the model produces.
pub const MIN_STABILITY: f64 = 0.1;
pub const MIN_DIFFICULTY: f64 = 1.0;
pub const MAX_DIFFICULTY: f64 = 10.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// FSRS scheduler over an immutable parameter set.
#[derive(Debug, Clone)]
pub struct Fsrs {
    params: SchedulerParams,
    /// Forgetting curve exponent, `-w[20]`.
    decay: f64,
    /// Curve scale chosen so that R(S, S) = 0.9.
    factor: f64,
}

impl Default for Fsrs {
    fn default() -> Self {
        Self::new(SchedulerParams::default())
    }
}

impl SpacedRepetitionAlgorithm for Fsrs {
    fn name(&self) -> &'static str {
        "fsrs"
    }

    fn init_card(&self, now: DateTime<Utc>) -> CardState {
        CardState {
            difficulty: self.initial_difficulty(Rating::Good),
            stability: self.initial_stability(Rating::Good),
            retrievability: 0.0,
            status: CardStatus::New,
            due: Some(now),
            lapses: 0,
            reps: 0,
            elapsed_days: 0,
            scheduled_days: 0,
            seed: 0,
        }
    }

    /// # Panics
    ///
    /// Panics if `card` fails [`CardState::validate`]; out-of-domain cards are
    /// a caller bug and are never coerced into range.
    fn schedule(
        &self,
        card: &CardState,
        rating: Rating,
        now: DateTime<Utc>,
        rng: &mut Rng,
    ) -> CardState {
        if let Err(err) = card.validate() {
            panic!("cannot schedule card: {err}");
        }

        let elapsed_days = Self::elapsed_days(card, now);
        let retrievability = if card.status == CardStatus::Review {
            self.forgetting_curve(f64::from(elapsed_days), card.stability)
        } else {
            card.retrievability
        };

        let status = Self::next_status(card.status, rating);
        let difficulty = self.next_difficulty(card.difficulty, rating);

        let (stability, lapses, interval) = if rating == Rating::Again {
            let stability = if card.status == CardStatus::Review {
                self.next_forget_stability(card.difficulty, card.stability, retrievability)
            } else {
                self.short_term_stability(card.stability, rating)
            };
            (stability, card.lapses + 1, 1)
        } else {
            let stability = match card.status {
                CardStatus::New | CardStatus::Learning => {
                    self.short_term_stability(card.stability, rating)
                }
                CardStatus::Review | CardStatus::Relearning => self.next_recall_stability(
                    card.difficulty,
                    card.stability,
                    retrievability,
                    rating,
                ),
            };
            (stability, card.lapses, self.next_interval(stability))
        };

        let scheduled_days = if self.params.enable_fuzz() {
            self.fuzz_interval(interval, rng)
        } else {
            interval
        };
        let due = now + Duration::days(i64::from(scheduled_days));

        tracing::debug!(
            rating = %rating,
            from = %card.status,
            to = %status,
            elapsed_days,
            stability,
            difficulty,
            scheduled_days,
            "scheduled card"
        );

        CardState {
            difficulty,
            stability,
            retrievability,
            status,
            due: Some(due),
            lapses,
            reps: card.reps + 1,
            elapsed_days,
            scheduled_days,
            seed: card.seed,
        }
    }
}

impl Fsrs {
    /// Create a scheduler, deriving the forgetting curve constants once.
    pub fn new(params: SchedulerParams) -> Self {
        let decay = -params.weights()[20];
        let factor = 0.9f64.powf(1.0 / decay) - 1.0;
        Self {
            params,
            decay,
            factor,
        }
    }

    pub fn params(&self) -> &SchedulerParams {
        &self.params
    }

    fn w(&self, index: usize) -> f64 {
        self.params.weights()[index]
    }

    /// Probability of recall after `elapsed_days` for a memory of `stability`.
    /// R(t, S) = (1 + FACTOR * t / S)^DECAY
    pub fn forgetting_curve(&self, elapsed_days: f64, stability: f64) -> f64 {
        (1.0 + self.factor * elapsed_days / stability).powf(self.decay)
    }

    /// Recall probability of a reviewed card at `now`, measured from its last review.
    ///
    /// The last review is recovered as `due - scheduled_days`. Never-reviewed
    /// cards report 0.
    pub fn current_retrievability(&self, card: &CardState, now: DateTime<Utc>) -> f64 {
        let Some(due) = card.due else {
            return 0.0;
        };
        if !card.is_reviewed() {
            return 0.0;
        }
        let last_review = due - Duration::days(i64::from(card.scheduled_days));
        let elapsed = now.signed_duration_since(last_review).num_seconds() as f64 / SECONDS_PER_DAY;
        self.forgetting_curve(elapsed.max(0.0), card.stability)
    }

    /// Optimal interval in days for the configured retention target.
    /// I = S / FACTOR * (R^(1/DECAY) - 1), rounded and clamped to [1, maximum_interval]
    pub fn next_interval(&self, stability: f64) -> u32 {
        let raw = stability / self.factor
            * (self.params.request_retention().powf(1.0 / self.decay) - 1.0);
        let max = f64::from(self.params.maximum_interval());
        raw.round().clamp(1.0, max) as u32
    }

    /// Initial stability for a first rating.
    /// S0(G) = w[G-1]
    pub fn initial_stability(&self, rating: Rating) -> f64 {
        let index = usize::from(rating.to_value() - 1);
        self.w(index).max(MIN_STABILITY)
    }

    /// Initial difficulty for a first rating.
    /// D0(G) = w[4] - e^(w[5] * (G - 1)) + 1
    pub fn initial_difficulty(&self, rating: Rating) -> f64 {
        let d0 = self.w(4) - (self.w(5) * (rating.grade() - 1.0)).exp() + 1.0;
        d0.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
    }

    /// Difficulty after a review, damped linearly near 10 and reverted
    /// toward D0(Easy).
    pub fn next_difficulty(&self, difficulty: f64, rating: Rating) -> f64 {
        let delta = -self.w(6) * (rating.grade() - 3.0);
        let damped = difficulty + delta * (10.0 - difficulty) / 9.0;
        let reverted =
            self.w(7) * self.initial_difficulty(Rating::Easy) + (1.0 - self.w(7)) * damped;
        reverted.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
    }

    /// Stability after a successful recall of a review card.
    /// S' = S * (1 + e^w[8] * (11 - D) * S^(-w[9]) * (e^(w[10]*(1-R)) - 1) * penalty * bonus)
    pub fn next_recall_stability(
        &self,
        difficulty: f64,
        stability: f64,
        retrievability: f64,
        rating: Rating,
    ) -> f64 {
        let hard_penalty = if rating == Rating::Hard { self.w(15) } else { 1.0 };
        let easy_bonus = if rating == Rating::Easy { self.w(16) } else { 1.0 };

        let growth = self.w(8).exp()
            * (11.0 - difficulty)
            * stability.powf(-self.w(9))
            * (((1.0 - retrievability) * self.w(10)).exp() - 1.0)
            * hard_penalty
            * easy_bonus;

        (stability * (1.0 + growth)).max(MIN_STABILITY)
    }

    /// Stability after a lapse of a review card, capped so it cannot grow.
    /// S' = min(w[11] * D^(-w[12]) * ((S+1)^w[13] - 1) * e^(w[14]*(1-R)), S / e^(w[17]*w[18]))
    pub fn next_forget_stability(
        &self,
        difficulty: f64,
        stability: f64,
        retrievability: f64,
    ) -> f64 {
        let forget = self.w(11)
            * difficulty.powf(-self.w(12))
            * ((stability + 1.0).powf(self.w(13)) - 1.0)
            * ((1.0 - retrievability) * self.w(14)).exp();
        let ceiling = stability / (self.w(17) * self.w(18)).exp();

        forget.min(ceiling).max(MIN_STABILITY)
    }

    /// Stability change for reviews in the learning steps.
    /// SInc = e^(w[17] * (G - 3 + w[18])) * S^(-w[19]); never below 1 for Good/Easy
    pub fn short_term_stability(&self, stability: f64, rating: Rating) -> f64 {
        let sinc = (self.w(17) * (rating.grade() - 3.0 + self.w(18))).exp()
            * stability.powf(-self.w(19));
        let sinc = if rating >= Rating::Good {
            sinc.max(1.0)
        } else {
            sinc
        };
        (stability * sinc).max(MIN_STABILITY)
    }

    /// Spread intervals of 3 days or more over a +/-5% band (plus one day).
    fn fuzz_interval(&self, interval: u32, rng: &mut Rng) -> u32 {
        let ivl = f64::from(interval);
        if ivl < 2.5 {
            return interval;
        }
        let max = self.params.maximum_interval();
        let high = ((ivl * 1.05 + 1.0).round() as u32).min(max);
        let low = ((ivl * 0.95 - 1.0).round() as u32).max(2).min(high);
        let fuzzed = rng.u32(low..=high);
        tracing::trace!(interval, low, high, fuzzed, "fuzzed interval");
        fuzzed
    }

    /// Whole days between the previous due date and `now`, never negative.
    fn elapsed_days(card: &CardState, now: DateTime<Utc>) -> u32 {
        match card.due {
            Some(due) => {
                let days = now.signed_duration_since(due).num_days().max(0);
                u32::try_from(days).unwrap_or(u32::MAX)
            }
            None => 0,
        }
    }

    /// Determine new status based on current status and rating.
    fn next_status(current: CardStatus, rating: Rating) -> CardStatus {
        match (current, rating) {
            (CardStatus::New, _) => CardStatus::Learning,
            (_, Rating::Again) => CardStatus::Relearning,
            (_, _) => CardStatus::Review,
        }
    }
}
