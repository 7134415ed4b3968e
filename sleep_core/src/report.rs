//! Report assembly: history → aggregate → suggestions → chart.
//!
//! A single night can't show a trend, so histories with fewer than
//! [`MIN_RECORDS_FOR_REPORT`] records produce
//! [`ReportOutcome::InsufficientHistory`] instead of a report. That is a
//! normal outcome, not an error.

use crate::aggregate::aggregate;
use crate::chart::{build_chart, ChartSpec};
use crate::suggest::{suggest_with, SuggestionThresholds};
use crate::{Advisory, AggregateView, Result, SleepRecord, TrendDirection};
use serde::Serialize;

pub const MIN_RECORDS_FOR_REPORT: usize = 2;

/// Everything handed to the renderer for one history
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub aggregate: AggregateView,
    pub trend_direction: TrendDirection,
    pub suggestions: Vec<Advisory>,
    pub chart: ChartSpec,
}

impl Report {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Clone, Debug)]
pub enum ReportOutcome {
    Ready(Box<Report>),
    /// Nothing to show yet; holds the number of records available
    InsufficientHistory { records: usize },
}

/// Build a report, or signal that the history is too short to chart
pub fn build_report(
    records: &[SleepRecord],
    thresholds: &SuggestionThresholds,
) -> Result<ReportOutcome> {
    if records.len() < MIN_RECORDS_FOR_REPORT {
        tracing::info!(
            "Only {} record(s) logged, skipping report",
            records.len()
        );
        return Ok(ReportOutcome::InsufficientHistory {
            records: records.len(),
        });
    }

    let aggregate = aggregate(records)?;
    let suggestions = suggest_with(&aggregate.latest, thresholds);
    let chart = build_chart(&aggregate);
    let trend_direction = aggregate.trend.direction();

    Ok(ReportOutcome::Ready(Box::new(Report {
        aggregate,
        trend_direction,
        suggestions,
        chart,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AdvisoryCategory, Error};
    use chrono::{Duration, TimeZone, Utc};

    fn record(days: i64, quality: f64) -> SleepRecord {
        SleepRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 4, 1, 7, 0, 0).unwrap() + Duration::days(days),
            name: "Sam".into(),
            age: 34,
            heart_rate: 62,
            activity_level: 9000,
            sleep_duration: 7.5,
            room_temperature: 19.0,
            caffeine_consumption: 1,
            alcohol_consumption: 0,
            screen_time: 0.5,
            sleep_quality: quality,
        }
    }

    #[test]
    fn test_empty_and_single_histories_are_suppressed() {
        let t = SuggestionThresholds::default();
        assert!(matches!(
            build_report(&[], &t).unwrap(),
            ReportOutcome::InsufficientHistory { records: 0 }
        ));
        assert!(matches!(
            build_report(&[record(0, 8.0)], &t).unwrap(),
            ReportOutcome::InsufficientHistory { records: 1 }
        ));
    }

    #[test]
    fn test_report_uses_latest_for_suggestions() {
        let mut late = record(1, 4.0);
        late.caffeine_consumption = 3;
        let records = vec![late, record(0, 8.0)];

        let report = match build_report(&records, &SuggestionThresholds::default()).unwrap() {
            ReportOutcome::Ready(report) => report,
            other => panic!("expected report, got {:?}", other),
        };

        assert_eq!(report.aggregate.series.len(), 2);
        assert_eq!(report.trend_direction, TrendDirection::Declining);
        assert_eq!(report.suggestions.len(), 1);
        assert_eq!(report.suggestions[0].category, AdvisoryCategory::Caffeine);
        assert_eq!(report.chart.panels.len(), 4);
    }

    #[test]
    fn test_aggregation_failure_propagates() {
        let mut bad = record(1, 6.0);
        bad.sleep_quality = f64::INFINITY;
        let result = build_report(&[record(0, 6.0), bad], &SuggestionThresholds::default());
        assert!(matches!(result, Err(Error::Aggregation(_))));
    }

    #[test]
    fn test_json_output() {
        let records = vec![record(0, 7.5), record(1, 8.0)];
        let report = match build_report(&records, &SuggestionThresholds::default()).unwrap() {
            ReportOutcome::Ready(report) => report,
            other => panic!("expected report, got {:?}", other),
        };

        let json = report.to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["trend_direction"], "improving");
        assert_eq!(value["suggestions"][0]["category"], "keep_it_up");
        assert_eq!(value["chart"]["panels"][0]["kind"], "quality_over_time");
        assert_eq!(value["aggregate"]["record_count"], 2);
    }
}
