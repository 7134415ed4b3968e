//! Core domain types for the sleep-quality tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Submitted entries and stored sleep records
//! - The aggregate view recomputed on every report
//! - Advisories produced by the suggestion engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Entry and Record Types
// ============================================================================

/// The metrics a user submits for one night, before scoring
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SleepEntry {
    pub name: String,
    pub age: u32,
    pub heart_rate: u32,
    pub activity_level: u32,
    pub sleep_duration: f64,
    pub room_temperature: f64,
    pub caffeine_consumption: u32,
    pub alcohol_consumption: u32,
    pub screen_time: f64,
}

/// A stored night of sleep metrics with its derived quality score
///
/// Records are immutable once written. `sleep_quality` is whatever the
/// estimator produced at insertion time and is never recomputed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SleepRecord {
    pub timestamp: DateTime<Utc>,
    pub name: String,
    pub age: u32,
    pub heart_rate: u32,
    pub activity_level: u32,
    pub sleep_duration: f64,
    pub room_temperature: f64,
    pub caffeine_consumption: u32,
    pub alcohol_consumption: u32,
    pub screen_time: f64,
    pub sleep_quality: f64,
}

impl SleepRecord {
    /// Attach a timestamp and score to a submitted entry
    pub fn from_entry(entry: SleepEntry, timestamp: DateTime<Utc>, sleep_quality: f64) -> Self {
        Self {
            timestamp,
            name: entry.name,
            age: entry.age,
            heart_rate: entry.heart_rate,
            activity_level: entry.activity_level,
            sleep_duration: entry.sleep_duration,
            room_temperature: entry.room_temperature,
            caffeine_consumption: entry.caffeine_consumption,
            alcohol_consumption: entry.alcohol_consumption,
            screen_time: entry.screen_time,
            sleep_quality,
        }
    }
}

// ============================================================================
// Aggregate Types
// ============================================================================

/// One point of the quality-over-time series
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct QualityPoint {
    pub timestamp: DateTime<Utc>,
    pub sleep_quality: f64,
}

/// First-degree least-squares fit of quality against seconds since epoch
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrendLine {
    /// Quality change per second
    pub slope: f64,
    pub intercept: f64,
}

/// Direction of the fitted trend
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Stable,
    Declining,
}

/// Arithmetic means across the whole history
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FactorMeans {
    pub sleep_duration: f64,
    pub heart_rate: f64,
    pub screen_time: f64,
    pub activity_level: f64,
    pub sleep_quality: f64,
}

/// Latest record's metrics mapped onto a roughly unit scale
///
/// Better raw values land near 1.0. Outliers may leave [0, 1]; nothing is
/// clamped here.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NormalizedFactors {
    pub sleep_duration: f64,
    pub heart_rate: f64,
    pub screen_time: f64,
    pub caffeine: f64,
    pub activity: f64,
}

impl NormalizedFactors {
    /// Values in fixed display order: duration, heart rate, screen, caffeine, activity
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.sleep_duration,
            self.heart_rate,
            self.screen_time,
            self.caffeine,
            self.activity,
        ]
    }
}

/// Number of unit-width histogram buckets spanning [1, 11)
pub const HISTOGRAM_BINS: usize = 10;

/// Sleep-quality distribution over buckets [1,2), [2,3), ... [10,11)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QualityHistogram {
    pub counts: [usize; HISTOGRAM_BINS],
}

impl QualityHistogram {
    /// Lower edge of a bucket (bucket 0 starts at 1.0)
    pub fn lower_edge(bin: usize) -> f64 {
        (bin + 1) as f64
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Everything the renderer needs, recomputed from the full history on each read
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AggregateView {
    pub series: Vec<QualityPoint>,
    pub trend: TrendLine,
    pub means: FactorMeans,
    pub latest_factors: NormalizedFactors,
    pub histogram: QualityHistogram,
    pub latest: SleepRecord,
    pub record_count: usize,
}

// ============================================================================
// Advisory Types
// ============================================================================

/// What an advisory is about
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryCategory {
    ShortSleep,
    LongSleep,
    HeartRate,
    ScreenTime,
    Caffeine,
    Alcohol,
    Activity,
    RoomTemperature,
    KeepItUp,
}

impl AdvisoryCategory {
    /// Fixed human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            AdvisoryCategory::ShortSleep => "Sleep Duration",
            AdvisoryCategory::LongSleep => "Sleep Duration",
            AdvisoryCategory::HeartRate => "Heart Rate",
            AdvisoryCategory::ScreenTime => "Screen Time",
            AdvisoryCategory::Caffeine => "Caffeine",
            AdvisoryCategory::Alcohol => "Alcohol",
            AdvisoryCategory::Activity => "Physical Activity",
            AdvisoryCategory::RoomTemperature => "Room Temperature",
            AdvisoryCategory::KeepItUp => "Great Job",
        }
    }
}

/// A (category, observation, recommendation) tuple from one threshold rule
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Advisory {
    pub category: AdvisoryCategory,
    pub observation: String,
    pub recommendation: String,
}
