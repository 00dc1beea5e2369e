//! Spaced repetition scheduling core for the vocabulary trainer.
//!
//! Provides:
//! - FSRS memory model (difficulty, stability, retrievability)
//! - Validated scheduler parameters with per-user/deck overrides
//! - Rating forecasts and study advice for review screens
//! - Shared types (CardState, CardStatus, Rating)
//!
//! Every operation is a pure function of its inputs: the clock and the fuzz
//! randomness source are passed in by the caller.

pub mod advice;
pub mod algorithm;
pub mod error;
pub mod params;
pub mod types;

pub use advice::{DifficultyLabel, RatingForecast, StudyAdvice};
pub use algorithm::fsrs::Fsrs;
pub use algorithm::{NextStates, SpacedRepetitionAlgorithm};
pub use error::{ConfigError, ContractError, Result};
pub use params::{ParamsOverride, SchedulerParams, DEFAULT_WEIGHTS};
pub use types::{CardState, CardStatus, Rating};
