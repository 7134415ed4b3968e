//! Renderer-agnostic chart data built from an [`AggregateView`].
//!
//! Panels carry semantic data only (points, bars, reference values, ranges).
//! Colours, fonts and geometry belong to whatever draws them.

use crate::{AggregateView, QualityHistogram, QualityPoint, HISTOGRAM_BINS};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Y-axis range of the quality-over-time panel
pub const QUALITY_AXIS: (f64, f64) = (0.0, 10.5);

pub const IDEAL_SLEEP_HOURS: f64 = 7.0;
pub const IDEAL_HEART_RATE: f64 = 70.0;

/// Steps are shown in thousands so the bar sits on the same axis as hours/bpm
const ACTIVITY_BAR_SCALE: f64 = 1000.0;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChartSpec {
    pub panels: Vec<Panel>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Panel {
    /// Quality per night with the fitted trend drawn across the same span
    QualityOverTime {
        title: String,
        points: Vec<QualityPoint>,
        trend_start: QualityPoint,
        trend_end: QualityPoint,
        y_range: (f64, f64),
    },
    /// Mean daily factors as bars, with ideal reference lines
    AverageFactors {
        title: String,
        bars: Vec<Bar>,
        reference_lines: Vec<ReferenceLine>,
    },
    /// Count of nights per quality bucket
    QualityDistribution { title: String, bins: Vec<HistogramBin> },
    /// Latest night's normalized factors, one spoke each
    FactorProfile { title: String, spokes: Vec<Spoke> },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ReferenceLine {
    pub label: String,
    pub value: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Spoke {
    pub label: String,
    pub value: f64,
}

const FACTOR_LABELS: [&str; 5] = ["Sleep Duration", "Heart Rate", "Screen Time", "Caffeine", "Activity"];

/// Lay out the four summary panels for a history
pub fn build_chart(view: &AggregateView) -> ChartSpec {
    ChartSpec {
        panels: vec![
            quality_panel(view),
            factors_panel(view),
            distribution_panel(&view.histogram),
            profile_panel(view),
        ],
    }
}

fn quality_panel(view: &AggregateView) -> Panel {
    let fitted = |timestamp: DateTime<Utc>| QualityPoint {
        timestamp,
        sleep_quality: view.trend.predict(timestamp),
    };

    let first = view.series.first().map(|p| p.timestamp).unwrap_or(view.latest.timestamp);
    let last = view.series.last().map(|p| p.timestamp).unwrap_or(view.latest.timestamp);

    Panel::QualityOverTime {
        title: "Your Sleep Quality Over Time".into(),
        points: view.series.clone(),
        trend_start: fitted(first),
        trend_end: fitted(last),
        y_range: QUALITY_AXIS,
    }
}

fn factors_panel(view: &AggregateView) -> Panel {
    let m = &view.means;
    let bar = |label: &str, value: f64| Bar {
        label: label.into(),
        value,
    };

    Panel::AverageFactors {
        title: "Average Daily Factors".into(),
        bars: vec![
            bar("Sleep Hours", m.sleep_duration),
            bar("Heart Rate", m.heart_rate),
            bar("Screen Time", m.screen_time),
            bar("Activity", m.activity_level / ACTIVITY_BAR_SCALE),
        ],
        reference_lines: vec![
            ReferenceLine {
                label: "Ideal Sleep".into(),
                value: IDEAL_SLEEP_HOURS,
            },
            ReferenceLine {
                label: "Ideal HR".into(),
                value: IDEAL_HEART_RATE,
            },
        ],
    }
}

fn distribution_panel(histogram: &QualityHistogram) -> Panel {
    let bins = (0..HISTOGRAM_BINS)
        .map(|i| HistogramBin {
            lower: QualityHistogram::lower_edge(i),
            upper: QualityHistogram::lower_edge(i) + 1.0,
            count: histogram.counts[i],
        })
        .collect();

    Panel::QualityDistribution {
        title: "Sleep Quality Distribution".into(),
        bins,
    }
}

fn profile_panel(view: &AggregateView) -> Panel {
    let spokes = FACTOR_LABELS
        .iter()
        .zip(view.latest_factors.as_array())
        .map(|(label, value)| Spoke {
            label: (*label).into(),
            value,
        })
        .collect();

    Panel::FactorProfile {
        title: "Latest Night Profile".into(),
        spokes,
    }
}
