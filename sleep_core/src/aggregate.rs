//! Trend aggregation over the full sleep history.
//!
//! Produces the [`AggregateView`] consumed by chart building and suggestions:
//! - Quality series sorted by timestamp
//! - Least-squares trend line over (seconds since epoch, quality)
//! - Factor means across all records
//! - Normalized factor vector for the latest record
//! - Quality histogram over ten unit buckets spanning [1, 11)

use crate::{
    AggregateView, Error, FactorMeans, NormalizedFactors, QualityHistogram, QualityPoint, Result,
    SleepRecord, TrendDirection, TrendLine, HISTOGRAM_BINS,
};
use chrono::{DateTime, Utc};

/// Quality change per day below which a trend counts as flat
pub const STABLE_SLOPE_PER_DAY: f64 = 0.05;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Aggregate a sleep history into a fresh view
///
/// Input order doesn't matter; records are stably sorted by timestamp first.
/// Fails with [`Error::Aggregation`] on an empty history or any non-finite
/// value, in which case nothing is returned.
pub fn aggregate(records: &[SleepRecord]) -> Result<AggregateView> {
    if records.is_empty() {
        return Err(Error::Aggregation("no records to aggregate".into()));
    }

    for (idx, record) in records.iter().enumerate() {
        check_finite(idx, record)?;
    }

    let mut sorted: Vec<&SleepRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.timestamp);

    let series: Vec<QualityPoint> = sorted
        .iter()
        .map(|r| QualityPoint {
            timestamp: r.timestamp,
            sleep_quality: r.sleep_quality,
        })
        .collect();

    let trend = fit_trend(&series);
    let means = factor_means(&sorted);
    let histogram = quality_histogram(&sorted);

    // Non-empty was checked above
    let latest = (*sorted[sorted.len() - 1]).clone();
    let latest_factors = normalize_factors(&latest);

    let view = AggregateView {
        series,
        trend,
        means,
        latest_factors,
        histogram,
        latest,
        record_count: records.len(),
    };

    for value in view.latest_factors.as_array() {
        if !value.is_finite() {
            return Err(Error::Aggregation(
                "normalized factors are not finite".into(),
            ));
        }
    }
    if !view.trend.slope.is_finite() || !view.trend.intercept.is_finite() {
        return Err(Error::Aggregation("trend fit is not finite".into()));
    }

    tracing::debug!(
        "Aggregated {} records: slope {:.3e}/s, mean quality {:.2}",
        view.record_count,
        view.trend.slope,
        view.means.sleep_quality
    );

    Ok(view)
}

fn check_finite(idx: usize, record: &SleepRecord) -> Result<()> {
    let fields = [
        ("sleep_duration", record.sleep_duration),
        ("room_temperature", record.room_temperature),
        ("screen_time", record.screen_time),
        ("sleep_quality", record.sleep_quality),
    ];

    for (field, value) in fields {
        if !value.is_finite() {
            return Err(Error::Aggregation(format!(
                "record {} ({}) has non-finite {}: {}",
                idx, record.timestamp, field, value
            )));
        }
    }
    Ok(())
}

/// Ordinary least squares of quality on integer epoch seconds
///
/// x is centred on its mean before fitting so the sums stay small. With zero
/// time variance the fit is undefined; slope is then 0 and the intercept is
/// the mean quality.
pub fn fit_trend(series: &[QualityPoint]) -> TrendLine {
    let n = series.len() as f64;
    if series.is_empty() {
        return TrendLine {
            slope: 0.0,
            intercept: 0.0,
        };
    }

    let xs: Vec<f64> = series.iter().map(|p| p.timestamp.timestamp() as f64).collect();
    let x_mean = xs.iter().sum::<f64>() / n;
    let y_mean = series.iter().map(|p| p.sleep_quality).sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (x, p) in xs.iter().zip(series) {
        let dx = x - x_mean;
        sxx += dx * dx;
        sxy += dx * (p.sleep_quality - y_mean);
    }

    if sxx == 0.0 {
        return TrendLine {
            slope: 0.0,
            intercept: y_mean,
        };
    }

    let slope = sxy / sxx;
    TrendLine {
        slope,
        intercept: y_mean - slope * x_mean,
    }
}

impl TrendLine {
    /// Fitted quality at a point in time
    pub fn predict(&self, at: DateTime<Utc>) -> f64 {
        self.slope * at.timestamp() as f64 + self.intercept
    }

    pub fn slope_per_day(&self) -> f64 {
        self.slope * SECONDS_PER_DAY
    }

    pub fn direction(&self) -> TrendDirection {
        let per_day = self.slope_per_day();
        if per_day > STABLE_SLOPE_PER_DAY {
            TrendDirection::Improving
        } else if per_day < -STABLE_SLOPE_PER_DAY {
            TrendDirection::Declining
        } else {
            TrendDirection::Stable
        }
    }
}

fn factor_means(records: &[&SleepRecord]) -> FactorMeans {
    let n = records.len() as f64;
    let mean = |f: fn(&SleepRecord) -> f64| records.iter().map(|r| f(*r)).sum::<f64>() / n;

    FactorMeans {
        sleep_duration: mean(|r| r.sleep_duration),
        heart_rate: mean(|r| f64::from(r.heart_rate)),
        screen_time: mean(|r| r.screen_time),
        activity_level: mean(|r| f64::from(r.activity_level)),
        sleep_quality: mean(|r| r.sleep_quality),
    }
}

/// Map a record's metrics onto a roughly [0, 1] "higher is better" scale
pub fn normalize_factors(record: &SleepRecord) -> NormalizedFactors {
    NormalizedFactors {
        sleep_duration: record.sleep_duration / 10.0,
        heart_rate: 1.0 - (f64::from(record.heart_rate) - 50.0) / 100.0,
        screen_time: 1.0 - record.screen_time / 8.0,
        caffeine: 1.0 - f64::from(record.caffeine_consumption) / 5.0,
        activity: f64::from(record.activity_level) / 10_000.0,
    }
}

fn quality_histogram(records: &[&SleepRecord]) -> QualityHistogram {
    let mut counts = [0usize; HISTOGRAM_BINS];
    for record in records {
        counts[histogram_bin(record.sleep_quality)] += 1;
    }
    QualityHistogram { counts }
}

/// Bucket index for a quality score; bucket 0 is [1, 2), bucket 9 is [10, 11)
pub fn histogram_bin(quality: f64) -> usize {
    let idx = (quality - 1.0).floor();
    if idx <= 0.0 {
        0
    } else {
        (idx as usize).min(HISTOGRAM_BINS - 1)
    }
}
