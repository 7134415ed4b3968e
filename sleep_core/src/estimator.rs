//! Heuristic sleep-quality estimator.
//!
//! The score is a hand-tuned linear combination around a base of 5.0, not a
//! trained model. Weights live in named tables keyed by [`EstimatorVersion`]
//! so stored history can be explained by the table that produced it:
//!
//! | term              | refined          | legacy           |
//! |-------------------|------------------|------------------|
//! | sleep duration    | +0.7 × (h − 7)   | +0.5 × (h − 7)   |
//! | heart rate        | −0.08 × (bpm − 65) | −0.05 × (bpm − 70) |
//! | screen time       | −0.4 × h         | −0.3 × h         |
//! | caffeine          | −0.3 × servings  | −0.2 × servings  |
//! | activity          | + steps / 2500   | + steps / 2000   |
//! | room temperature  | −0.1 × (°C − 20) | —                |
//! | alcohol           | −0.5 × drinks    | —                |
//!
//! The sum is rounded to one decimal and clamped to [1, 10].

use crate::SleepEntry;
use serde::{Deserialize, Serialize};

pub const MIN_QUALITY: f64 = 1.0;
pub const MAX_QUALITY: f64 = 10.0;

/// Which weight table to score with
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorVersion {
    /// Original coarse weights, no temperature or alcohol terms
    Legacy,
    #[default]
    Refined,
}

impl EstimatorVersion {
    pub fn weights(&self) -> &'static WeightTable {
        match self {
            EstimatorVersion::Legacy => &LEGACY_WEIGHTS,
            EstimatorVersion::Refined => &REFINED_WEIGHTS,
        }
    }

    /// Parse a version name as it appears in config or on the command line
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "legacy" | "v1" => Some(EstimatorVersion::Legacy),
            "refined" | "v2" => Some(EstimatorVersion::Refined),
            _ => None,
        }
    }
}

/// Coefficients of the linear scoring formula
#[derive(Clone, Debug, PartialEq)]
pub struct WeightTable {
    pub base: f64,
    pub duration_weight: f64,
    pub duration_target: f64,
    pub heart_rate_weight: f64,
    pub heart_rate_target: f64,
    pub screen_time_weight: f64,
    pub caffeine_weight: f64,
    pub activity_divisor: f64,
    /// (weight, target °C); `None` disables the term
    pub temperature: Option<(f64, f64)>,
    pub alcohol_weight: Option<f64>,
}

pub static REFINED_WEIGHTS: WeightTable = WeightTable {
    base: 5.0,
    duration_weight: 0.7,
    duration_target: 7.0,
    heart_rate_weight: 0.08,
    heart_rate_target: 65.0,
    screen_time_weight: 0.4,
    caffeine_weight: 0.3,
    activity_divisor: 2500.0,
    temperature: Some((0.1, 20.0)),
    alcohol_weight: Some(0.5),
};

pub static LEGACY_WEIGHTS: WeightTable = WeightTable {
    base: 5.0,
    duration_weight: 0.5,
    duration_target: 7.0,
    heart_rate_weight: 0.05,
    heart_rate_target: 70.0,
    screen_time_weight: 0.3,
    caffeine_weight: 0.2,
    activity_divisor: 2000.0,
    temperature: None,
    alcohol_weight: None,
};

/// Score one night with the canonical (refined) weights
///
/// `room_temperature` and `alcohol` are optional; an absent input simply
/// drops its term. Inputs are assumed validated, so this never fails.
pub fn estimate(
    duration: f64,
    heart_rate: f64,
    screen_time: f64,
    caffeine: f64,
    activity_level: f64,
    room_temperature: Option<f64>,
    alcohol: Option<f64>,
) -> f64 {
    REFINED_WEIGHTS.score(
        duration,
        heart_rate,
        screen_time,
        caffeine,
        activity_level,
        room_temperature,
        alcohol,
    )
}

/// Score a submitted entry with the given weight table version
pub fn estimate_entry(entry: &SleepEntry, version: EstimatorVersion) -> f64 {
    version.weights().score(
        entry.sleep_duration,
        f64::from(entry.heart_rate),
        entry.screen_time,
        f64::from(entry.caffeine_consumption),
        f64::from(entry.activity_level),
        Some(entry.room_temperature),
        Some(f64::from(entry.alcohol_consumption)),
    )
}

impl WeightTable {
    #[allow(clippy::too_many_arguments)]
    pub fn score(
        &self,
        duration: f64,
        heart_rate: f64,
        screen_time: f64,
        caffeine: f64,
        activity_level: f64,
        room_temperature: Option<f64>,
        alcohol: Option<f64>,
    ) -> f64 {
        let mut quality = self.base;

        quality += self.duration_weight * (duration - self.duration_target);
        quality -= self.heart_rate_weight * (heart_rate - self.heart_rate_target);
        quality -= self.screen_time_weight * screen_time;
        quality -= self.caffeine_weight * caffeine;
        quality += activity_level / self.activity_divisor;

        if let (Some((weight, target)), Some(temp)) = (self.temperature, room_temperature) {
            quality -= weight * (temp - target);
        }
        if let (Some(weight), Some(drinks)) = (self.alcohol_weight, alcohol) {
            quality -= weight * drinks;
        }

        round_one_decimal(quality).clamp(MIN_QUALITY, MAX_QUALITY)
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
