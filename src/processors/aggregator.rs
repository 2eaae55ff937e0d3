use crate::models::CanonicalTripRecord;
use crate::processors::summary::TripSummary;
use crate::utils::constants::{ACCEPTED_DATETIME_FORMATS, DEFAULT_TOP_N};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;

/// Merged, enriched and filtered trips with the statistics computed over them
#[derive(Debug, Clone)]
pub struct AggregationResult {
    pub records: Vec<CanonicalTripRecord>,
    pub summary: TripSummary,
}

/// Combines normalised tables into the final canonical table.
///
/// Rows whose `start_date` does not parse are kept with empty calendar
/// columns; the only row filter is `duration_seconds > 0`.
pub struct Aggregator {
    top_n: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_top_n(top_n: usize) -> Self {
        Self { top_n }
    }

    pub fn aggregate(&self, tables: Vec<Vec<CanonicalTripRecord>>) -> AggregationResult {
        let mut combined: Vec<CanonicalTripRecord> = tables.into_iter().flatten().collect();
        let rows_before_filter = combined.len();
        info!(rows = rows_before_filter, "combined normalised tables");

        let valid_start_dates = enrich_calendar_fields(&mut combined);
        info!(valid_start_dates, "derived calendar fields");

        let records: Vec<CanonicalTripRecord> = combined
            .into_iter()
            .filter(CanonicalTripRecord::has_positive_duration)
            .collect();
        info!(
            kept = records.len(),
            total = rows_before_filter,
            "filtered out trips without a positive duration"
        );

        let summary =
            TripSummary::from_records(&records, rows_before_filter, valid_start_dates, self.top_n);

        AggregationResult { records, summary }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive calendar columns where `start_date` parses; returns how many did
fn enrich_calendar_fields(records: &mut [CanonicalTripRecord]) -> usize {
    let mut valid = 0;

    for record in records.iter_mut() {
        if let Some(start) = record.start_date.as_deref().and_then(parse_canonical_datetime) {
            record.set_calendar_fields(start);
            valid += 1;
        }
    }

    valid
}

/// Parse a canonical timestamp, also accepting seconds, a `T` separator, or a bare date
pub fn parse_canonical_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    ACCEPTED_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn trip(source: &str, start: Option<&str>, duration: Option<f64>) -> CanonicalTripRecord {
        let mut record = CanonicalTripRecord::new(source);
        record.start_date = start.map(str::to_string);
        record.duration_seconds = duration;
        record.start_station_id = "1".to_string();
        record.end_station_id = "2".to_string();
        record.bike_id = "b".to_string();
        record
    }

    #[test]
    fn test_parse_canonical_datetime() {
        for value in [
            "2022-09-14 17:45",
            "2022-09-14 17:45:00",
            "2022-09-14T17:45:00",
            " 2022-09-14 17:45 ",
        ] {
            let parsed = parse_canonical_datetime(value).unwrap();
            assert_eq!(parsed.to_string(), "2022-09-14 17:45:00", "{}", value);
        }

        assert_eq!(
            parse_canonical_datetime("2022-09-14").unwrap().to_string(),
            "2022-09-14 00:00:00"
        );
        assert_eq!(parse_canonical_datetime("14/09/2022 17:45"), None);
        assert_eq!(parse_canonical_datetime(""), None);
    }

    #[test]
    fn test_filters_non_positive_durations() {
        let result = Aggregator::new().aggregate(vec![vec![
            trip("a.csv", Some("2022-09-14 17:45"), Some(60.0)),
            trip("a.csv", Some("2022-09-14 17:45"), Some(0.0)),
            trip("a.csv", Some("2022-09-14 17:45"), None),
            trip("a.csv", Some("2022-09-14 17:45"), Some(-5.0)),
            trip("a.csv", Some("2022-09-14 17:45"), Some(f64::NAN)),
        ]]);

        assert_eq!(result.records.len(), 1);
        assert_eq!(result.summary.rows_before_filter, 5);
        assert_eq!(result.summary.rows_after_filter, 1);
        assert!(result.records.iter().all(|r| r.has_positive_duration()));
    }

    #[test]
    fn test_unparseable_start_date_is_retained_without_calendar() {
        let result = Aggregator::new().aggregate(vec![vec![
            trip("a.csv", Some("not a date"), Some(60.0)),
            trip("a.csv", None, Some(90.0)),
            trip("a.csv", Some("2021-07-07 08:30"), Some(30.0)),
        ]]);

        assert_eq!(result.records.len(), 3);
        assert_eq!(result.summary.valid_start_dates, 1);
        assert!(!result.records[0].has_calendar_fields());
        assert!(!result.records[1].has_calendar_fields());
        assert_eq!(result.records[2].day_of_week.as_deref(), Some("Wednesday"));
        assert_eq!(result.records[2].hour_of_day, Some(8));
        assert_eq!(result.records[2].month_name.as_deref(), Some("July"));
        assert_eq!(result.records[2].year, Some(2021));
    }

    #[test]
    fn test_concatenation_preserves_provenance_and_order() {
        let result = Aggregator::new().aggregate(vec![
            vec![trip("a.csv", None, Some(1.0)), trip("a.csv", None, Some(2.0))],
            vec![trip("b.csv", None, Some(3.0))],
        ]);

        let sources: Vec<&str> = result.records.iter().map(|r| r.source_file.as_str()).collect();
        assert_eq!(sources, vec!["a.csv", "a.csv", "b.csv"]);
    }

    #[test]
    fn test_retained_set_is_order_independent() {
        let a = vec![
            trip("a.csv", Some("2022-01-01 10:00"), Some(60.0)),
            trip("a.csv", Some("2022-01-01 11:00"), Some(0.0)),
        ];
        let b = vec![
            trip("b.csv", Some("2020-01-01 00:00"), Some(120.0)),
            trip("b.csv", Some("2020-01-01 01:00"), Some(-5.0)),
        ];

        let key = |r: &CanonicalTripRecord| {
            (r.source_file.clone(), r.start_date.clone(), r.duration_seconds.map(|d| d as i64))
        };

        let forward: BTreeSet<_> = Aggregator::new()
            .aggregate(vec![a.clone(), b.clone()])
            .records
            .iter()
            .map(key)
            .collect();
        let backward: BTreeSet<_> = Aggregator::new()
            .aggregate(vec![b, a])
            .records
            .iter()
            .map(key)
            .collect();

        assert_eq!(forward, backward);
        assert_eq!(forward.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let result = Aggregator::new().aggregate(Vec::new());
        assert!(result.records.is_empty());
        assert_eq!(result.summary.rows_before_filter, 0);
    }
}
