//! Rule-based suggestions for the latest night.
//!
//! Rules are evaluated independently, in a fixed order, against the most
//! recent record:
//! 1. Sleep duration (short OR long, never both)
//! 2. Heart rate
//! 3. Screen time
//! 4. Caffeine
//! 5. Alcohol
//! 6. Activity
//! 7. Room temperature
//!
//! When nothing fires and quality is good, a single positive entry is
//! returned. When nothing fires and quality is below that bar, the result is
//! empty.

use crate::{Advisory, AdvisoryCategory, SleepRecord};
use serde::{Deserialize, Serialize};

/// Thresholds used by the suggestion rules
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SuggestionThresholds {
    #[serde(default = "default_short_sleep_hours")]
    pub short_sleep_hours: f64,

    #[serde(default = "default_long_sleep_hours")]
    pub long_sleep_hours: f64,

    #[serde(default = "default_max_heart_rate")]
    pub max_heart_rate: u32,

    #[serde(default = "default_max_screen_time_hours")]
    pub max_screen_time_hours: f64,

    #[serde(default = "default_max_caffeine")]
    pub max_caffeine: u32,

    #[serde(default = "default_max_alcohol")]
    pub max_alcohol: u32,

    #[serde(default = "default_min_activity_steps")]
    pub min_activity_steps: u32,

    #[serde(default = "default_max_room_temperature")]
    pub max_room_temperature: f64,

    /// Quality at or above which a clean night earns positive feedback
    #[serde(default = "default_positive_quality")]
    pub positive_quality: f64,
}

impl Default for SuggestionThresholds {
    fn default() -> Self {
        Self {
            short_sleep_hours: default_short_sleep_hours(),
            long_sleep_hours: default_long_sleep_hours(),
            max_heart_rate: default_max_heart_rate(),
            max_screen_time_hours: default_max_screen_time_hours(),
            max_caffeine: default_max_caffeine(),
            max_alcohol: default_max_alcohol(),
            min_activity_steps: default_min_activity_steps(),
            max_room_temperature: default_max_room_temperature(),
            positive_quality: default_positive_quality(),
        }
    }
}

fn default_short_sleep_hours() -> f64 {
    6.0
}

fn default_long_sleep_hours() -> f64 {
    9.0
}

fn default_max_heart_rate() -> u32 {
    80
}

fn default_max_screen_time_hours() -> f64 {
    2.0
}

fn default_max_caffeine() -> u32 {
    2
}

fn default_max_alcohol() -> u32 {
    1
}

fn default_min_activity_steps() -> u32 {
    5000
}

fn default_max_room_temperature() -> f64 {
    22.0
}

fn default_positive_quality() -> f64 {
    7.0
}

const SHORT_SLEEP_ADVICE: &str =
    "Aim for 7-9 hours by keeping a consistent bedtime and wake time, even on weekends.";
const LONG_SLEEP_ADVICE: &str =
    "Regularly sleeping this long can leave you groggy; keep a fixed wake time and mention it to a doctor if it persists.";
const HEART_RATE_ADVICE: &str =
    "Wind down with deep breathing or meditation, and avoid intense exercise close to bedtime.";
const SCREEN_TIME_ADVICE: &str =
    "Put screens away at least an hour before bed, or switch on a blue-light filter.";
const CAFFEINE_ADVICE: &str =
    "Keep caffeine to the morning and skip it within 6 hours of bedtime.";
const ALCOHOL_ADVICE: &str =
    "Alcohol fragments sleep later in the night; limit drinks and finish them well before bed.";
const ACTIVITY_ADVICE: &str =
    "Add a walk or some exercise during the day; regular activity helps you fall asleep faster.";
const ROOM_TEMPERATURE_ADVICE: &str =
    "Keep the bedroom cool, around 18-20°C, for more restful sleep.";
const KEEP_IT_UP_ADVICE: &str = "Keep up your current routine.";

/// Suggestions for the latest record using the default thresholds
pub fn suggest(latest: &SleepRecord) -> Vec<Advisory> {
    suggest_with(latest, &SuggestionThresholds::default())
}

/// Suggestions for the latest record using custom thresholds
pub fn suggest_with(latest: &SleepRecord, t: &SuggestionThresholds) -> Vec<Advisory> {
    let mut advisories = Vec::new();

    if latest.sleep_duration < t.short_sleep_hours {
        advisories.push(advisory(
            AdvisoryCategory::ShortSleep,
            format!(
                "You slept {:.1} hours, less than the {:.0}+ hours most adults need.",
                latest.sleep_duration, t.short_sleep_hours
            ),
            SHORT_SLEEP_ADVICE,
        ));
    } else if latest.sleep_duration > t.long_sleep_hours {
        advisories.push(advisory(
            AdvisoryCategory::LongSleep,
            format!(
                "You slept {:.1} hours, more than {:.0} hours.",
                latest.sleep_duration, t.long_sleep_hours
            ),
            LONG_SLEEP_ADVICE,
        ));
    }

    if latest.heart_rate > t.max_heart_rate {
        advisories.push(advisory(
            AdvisoryCategory::HeartRate,
            format!("Your resting heart rate was {} bpm.", latest.heart_rate),
            HEART_RATE_ADVICE,
        ));
    }

    if latest.screen_time > t.max_screen_time_hours {
        advisories.push(advisory(
            AdvisoryCategory::ScreenTime,
            format!(
                "You had {:.1} hours of screen time before bed.",
                latest.screen_time
            ),
            SCREEN_TIME_ADVICE,
        ));
    }

    if latest.caffeine_consumption > t.max_caffeine {
        advisories.push(advisory(
            AdvisoryCategory::Caffeine,
            format!(
                "You had {} servings of caffeine.",
                latest.caffeine_consumption
            ),
            CAFFEINE_ADVICE,
        ));
    }

    if latest.alcohol_consumption > t.max_alcohol {
        advisories.push(advisory(
            AdvisoryCategory::Alcohol,
            format!("You had {} alcoholic drinks.", latest.alcohol_consumption),
            ALCOHOL_ADVICE,
        ));
    }

    if latest.activity_level < t.min_activity_steps {
        advisories.push(advisory(
            AdvisoryCategory::Activity,
            format!("You logged {} steps.", latest.activity_level),
            ACTIVITY_ADVICE,
        ));
    }

    if latest.room_temperature > t.max_room_temperature {
        advisories.push(advisory(
            AdvisoryCategory::RoomTemperature,
            format!("Your room was {:.1}°C.", latest.room_temperature),
            ROOM_TEMPERATURE_ADVICE,
        ));
    }

    if advisories.is_empty() && latest.sleep_quality >= t.positive_quality {
        advisories.push(advisory(
            AdvisoryCategory::KeepItUp,
            format!(
                "Your sleep quality was {:.1}/10 with no risk factors flagged.",
                latest.sleep_quality
            ),
            KEEP_IT_UP_ADVICE,
        ));
    }

    tracing::debug!("Produced {} advisories", advisories.len());
    advisories
}

fn advisory(category: AdvisoryCategory, observation: String, recommendation: &str) -> Advisory {
    Advisory {
        category,
        observation,
        recommendation: recommendation.to_string(),
    }
}
