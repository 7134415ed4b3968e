//! Ingestion of submitted entries.
//!
//! Entries are validated here, before the estimator ever sees them, then
//! scored, stamped and appended to the store.

use crate::estimator::{estimate_entry, EstimatorVersion};
use crate::store::RecordStore;
use crate::{Error, Result, SleepEntry, SleepRecord};
use chrono::{DateTime, Utc};
use std::ops::RangeInclusive;

pub const HEART_RATE_RANGE: RangeInclusive<u32> = 30..=200;
pub const SLEEP_DURATION_RANGE: RangeInclusive<f64> = 0.0..=24.0;

impl SleepEntry {
    /// Reject entries outside the domains the estimator expects
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidInput("name must not be empty".into()));
        }

        if self.age == 0 {
            return Err(Error::InvalidInput("age must be positive".into()));
        }

        if !HEART_RATE_RANGE.contains(&self.heart_rate) {
            return Err(Error::InvalidInput(format!(
                "heart rate {} bpm is outside {}-{}",
                self.heart_rate,
                HEART_RATE_RANGE.start(),
                HEART_RATE_RANGE.end()
            )));
        }

        // contains() is false for NaN, which covers the finite check too
        if !SLEEP_DURATION_RANGE.contains(&self.sleep_duration) {
            return Err(Error::InvalidInput(format!(
                "sleep duration {} h is outside 0-24",
                self.sleep_duration
            )));
        }

        if !self.screen_time.is_finite() || self.screen_time < 0.0 {
            return Err(Error::InvalidInput(format!(
                "screen time {} h must be a non-negative number",
                self.screen_time
            )));
        }

        if !self.room_temperature.is_finite() {
            return Err(Error::InvalidInput(format!(
                "room temperature {} is not a number",
                self.room_temperature
            )));
        }

        Ok(())
    }
}

/// Validate, score and build a record without storing it
pub fn score_entry(
    entry: SleepEntry,
    version: EstimatorVersion,
    now: DateTime<Utc>,
) -> Result<SleepRecord> {
    entry.validate()?;
    let quality = estimate_entry(&entry, version);
    tracing::debug!("Scored entry for {} with {:?} weights: {}", entry.name, version, quality);
    Ok(SleepRecord::from_entry(entry, now, quality))
}

/// Validate, score and append an entry; returns the stored record
pub fn record_entry<S: RecordStore>(
    store: &mut S,
    entry: SleepEntry,
    version: EstimatorVersion,
    now: DateTime<Utc>,
) -> Result<SleepRecord> {
    let record = score_entry(entry, version, now)?;
    store.append(&record)?;
    Ok(record)
}
