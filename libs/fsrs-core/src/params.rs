//! Scheduler parameter set and per-user/deck overrides.
//!
//! Weight indices are positional and shared with externally stored parameter
//! sets:
//!
//! | index | role |
//! |-------|------|
//! | 0-3   | initial stability for again, hard, good, easy |
//! | 4, 5  | initial difficulty base and exponent |
//! | 6     | difficulty delta per rating step |
//! | 7     | mean reversion weight |
//! | 8-10  | recall stability scale, saturation, retrievability effect |
//! | 11-14 | forget stability scale, difficulty, stability, retrievability exponents |
//! | 15    | hard penalty |
//! | 16    | easy bonus |
//! | 17-19 | short-term stability scale, rating offset, saturation |
//! | 20    | forgetting curve decay |

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Number of weights in a parameter set.
pub const WEIGHT_COUNT: usize = 21;

/// Default weights (FSRS-6).
pub const DEFAULT_WEIGHTS: [f64; WEIGHT_COUNT] = [
    0.212, 1.2931, 2.3065, 8.2956, // w[0-3]: initial stability for Again, Hard, Good, Easy
    6.4133, // w[4]: initial difficulty base
    0.8334, // w[5]: initial difficulty exponent
    3.0194, // w[6]: difficulty delta
    0.001,  // w[7]: mean reversion weight
    1.8722, // w[8]: recall stability scale
    0.1666, // w[9]: recall stability saturation
    0.796,  // w[10]: recall retrievability effect
    1.4835, // w[11]: forget stability scale
    0.0614, // w[12]: difficulty on forget
    0.2629, // w[13]: stability on forget
    1.6483, // w[14]: retrievability on forget
    0.6014, // w[15]: hard penalty
    1.8729, // w[16]: easy bonus
    0.5425, // w[17]: short-term scale
    0.0912, // w[18]: short-term rating offset
    0.0658, // w[19]: short-term saturation
    0.1542, // w[20]: forgetting curve decay
];

const DECAY_INDEX: usize = 20;

pub const DEFAULT_REQUEST_RETENTION: f64 = 0.9;
pub const DEFAULT_MAXIMUM_INTERVAL: u32 = 36500;

/// Validated, immutable scheduler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParams", into = "RawParams")]
pub struct SchedulerParams {
    weights: [f64; WEIGHT_COUNT],
    request_retention: f64,
    maximum_interval: u32,
    enable_fuzz: bool,
}

impl SchedulerParams {
    /// Build a parameter set, rejecting malformed models up front.
    pub fn new(
        weights: &[f64],
        request_retention: f64,
        maximum_interval: u32,
        enable_fuzz: bool,
    ) -> Result<Self> {
        let weights: [f64; WEIGHT_COUNT] =
            weights.try_into().map_err(|_| ConfigError::WeightCount {
                expected: WEIGHT_COUNT,
                actual: weights.len(),
            })?;

        if let Some((index, &value)) = weights.iter().enumerate().find(|(_, w)| !w.is_finite()) {
            return Err(ConfigError::NonFiniteWeight { index, value });
        }
        if weights[DECAY_INDEX] <= 0.0 {
            return Err(ConfigError::Decay(weights[DECAY_INDEX]));
        }
        if !(request_retention > 0.0 && request_retention < 1.0) {
            return Err(ConfigError::RequestRetention(request_retention));
        }
        if maximum_interval < 1 {
            return Err(ConfigError::MaximumInterval(maximum_interval));
        }

        Ok(Self {
            weights,
            request_retention,
            maximum_interval,
            enable_fuzz,
        })
    }

    /// Merge optional overrides over a base parameter set and re-validate.
    pub fn resolve(base: &Self, overrides: Option<&ParamsOverride>) -> Result<Self> {
        let Some(o) = overrides else {
            return Ok(base.clone());
        };
        let weights = o.weights.as_deref().unwrap_or(&base.weights[..]);
        Self::new(
            weights,
            o.request_retention.unwrap_or(base.request_retention),
            o.maximum_interval.unwrap_or(base.maximum_interval),
            o.enable_fuzz.unwrap_or(base.enable_fuzz),
        )
    }

    pub fn weights(&self) -> &[f64; WEIGHT_COUNT] {
        &self.weights
    }

    pub fn request_retention(&self) -> f64 {
        self.request_retention
    }

    pub fn maximum_interval(&self) -> u32 {
        self.maximum_interval
    }

    pub fn enable_fuzz(&self) -> bool {
        self.enable_fuzz
    }
}

impl Default for SchedulerParams {
    fn default() -> Self {
        Self {
            weights: DEFAULT_WEIGHTS,
            request_retention: DEFAULT_REQUEST_RETENTION,
            maximum_interval: DEFAULT_MAXIMUM_INTERVAL,
            enable_fuzz: true,
        }
    }
}

/// Unvalidated wire form of [`SchedulerParams`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawParams {
    weights: Vec<f64>,
    #[serde(default = "default_request_retention")]
    request_retention: f64,
    #[serde(default = "default_maximum_interval")]
    maximum_interval: u32,
    #[serde(default = "default_enable_fuzz")]
    enable_fuzz: bool,
}

fn default_request_retention() -> f64 {
    DEFAULT_REQUEST_RETENTION
}

fn default_maximum_interval() -> u32 {
    DEFAULT_MAXIMUM_INTERVAL
}

fn default_enable_fuzz() -> bool {
    true
}

impl TryFrom<RawParams> for SchedulerParams {
    type Error = ConfigError;

    fn try_from(raw: RawParams) -> Result<Self> {
        Self::new(
            &raw.weights,
            raw.request_retention,
            raw.maximum_interval,
            raw.enable_fuzz,
        )
    }
}

impl From<SchedulerParams> for RawParams {
    fn from(params: SchedulerParams) -> Self {
        Self {
            weights: params.weights.to_vec(),
            request_retention: params.request_retention,
            maximum_interval: params.maximum_interval,
            enable_fuzz: params.enable_fuzz,
        }
    }
}

/// Per-user or per-deck overrides (all fields optional).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamsOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_retention: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_fuzz: Option<bool>,
}
