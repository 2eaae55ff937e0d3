use crate::models::CanonicalTripRecord;
use crate::processors::aggregator::parse_canonical_datetime;
use crate::utils::constants::TOP_STATIONS;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Reporting-only statistics over the retained trips; never persisted with the table
#[derive(Debug, Clone, Serialize)]
pub struct TripSummary {
    pub rows_before_filter: usize,
    pub rows_after_filter: usize,
    pub valid_start_dates: usize,
    pub date_range: Option<(NaiveDateTime, NaiveDateTime)>,
    pub average_duration_seconds: Option<f64>,
    pub entities: Vec<EntitySummary>,
    pub stations: StationConsistency,
    pub top_start_stations: Vec<StationCount>,
    pub top_end_stations: Vec<StationCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySummary {
    pub column: &'static str,
    pub unique_count: usize,
    pub top_values: Vec<(String, usize)>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StationConsistency {
    pub unique_start: usize,
    pub unique_end: usize,
    pub only_start: BTreeSet<String>,
    pub only_end: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationCount {
    pub station_id: String,
    pub station_name: String,
    pub trips: usize,
}

type Extractor = fn(&CanonicalTripRecord) -> &str;

const ENTITY_COLUMNS: [(&str, Extractor); 3] = [
    ("bike_id", bike_id),
    ("start_station_id", start_station_id),
    ("end_station_id", end_station_id),
];

fn bike_id(record: &CanonicalTripRecord) -> &str {
    &record.bike_id
}

fn start_station_id(record: &CanonicalTripRecord) -> &str {
    &record.start_station_id
}

fn end_station_id(record: &CanonicalTripRecord) -> &str {
    &record.end_station_id
}

impl TripSummary {
    pub fn from_records(
        records: &[CanonicalTripRecord],
        rows_before_filter: usize,
        valid_start_dates: usize,
        top_n: usize,
    ) -> Self {
        let entities = ENTITY_COLUMNS
            .iter()
            .map(|&(column, extract)| {
                let counts = count_values(records, extract);
                EntitySummary {
                    column,
                    unique_count: counts.len(),
                    top_values: top_counts(&counts, top_n)
                        .into_iter()
                        .map(|(value, count)| (value.to_string(), count))
                        .collect(),
                }
            })
            .collect();

        Self {
            rows_before_filter,
            rows_after_filter: records.len(),
            valid_start_dates,
            date_range: date_range(records),
            average_duration_seconds: average_duration(records),
            entities,
            stations: station_consistency(records),
            top_start_stations: top_stations(records, |r| (&r.start_station_id, &r.start_station_name)),
            top_end_stations: top_stations(records, |r| (&r.end_station_id, &r.end_station_name)),
        }
    }

    pub fn rows_dropped(&self) -> usize {
        self.rows_before_filter - self.rows_after_filter
    }

    pub fn entity(&self, column: &str) -> Option<&EntitySummary> {
        self.entities.iter().find(|e| e.column == column)
    }

    pub fn display_summary(&self) -> String {
        let mut summary = String::from("=== Trip Data Summary ===\n");

        summary.push_str(&format!(
            "Kept {} valid rows out of {} total rows\n",
            self.rows_after_filter, self.rows_before_filter
        ));
        summary.push_str(&format!("Valid start dates: {}\n", self.valid_start_dates));

        if let Some((start, end)) = &self.date_range {
            summary.push_str(&format!("Date range: {} to {}\n", start, end));
        }

        if let Some(avg) = self.average_duration_seconds {
            summary.push_str(&format!("Average trip duration: {:.2} minutes\n", avg / 60.0));
        }

        for entity in &self.entities {
            summary.push_str(&format!("\nUnique {}: {}\n", entity.column, entity.unique_count));
            summary.push_str(&format!("Top {} {}:\n", entity.top_values.len(), entity.column));
            for (value, count) in &entity.top_values {
                summary.push_str(&format!("  {}: {} trips\n", value, count));
            }
        }

        summary.push_str(&format!(
            "\nUnique start stations: {}\nUnique end stations: {}\n",
            self.stations.unique_start, self.stations.unique_end
        ));
        summary.push_str(&format!(
            "Stations that only appear as start stations: {}\n",
            self.stations.only_start.len()
        ));
        summary.push_str(&format!(
            "Stations that only appear as end stations: {}\n",
            self.stations.only_end.len()
        ));

        for (label, stations) in [
            ("start", &self.top_start_stations),
            ("end", &self.top_end_stations),
        ] {
            summary.push_str(&format!("\nTop {} {} stations:\n", stations.len(), label));
            for station in stations {
                summary.push_str(&format!(
                    "  {} ({}): {} trips\n",
                    station.station_id, station.station_name, station.trips
                ));
            }
        }

        summary
    }
}

/// Occurrences of each non-empty value
fn count_values<'a>(
    records: &'a [CanonicalTripRecord],
    extract: Extractor,
) -> HashMap<&'a str, usize> {
    let mut counts = HashMap::new();
    for record in records {
        let value = extract(record);
        if !value.is_empty() {
            *counts.entry(value).or_insert(0) += 1;
        }
    }
    counts
}

/// Highest counts first; ties broken by value so the output is stable
fn top_counts<'a>(counts: &HashMap<&'a str, usize>, n: usize) -> Vec<(&'a str, usize)> {
    let mut sorted: Vec<(&str, usize)> = counts.iter().map(|(v, c)| (*v, *c)).collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    sorted.truncate(n);
    sorted
}

fn date_range(records: &[CanonicalTripRecord]) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let parse = |value: &Option<String>| value.as_deref().and_then(parse_canonical_datetime);

    records
        .iter()
        .filter_map(|r| Some((parse(&r.start_date)?, parse(&r.end_date)?)))
        .fold(None, |range, (start, end)| match range {
            None => Some((start, end)),
            Some((earliest, latest)) => Some((earliest.min(start), latest.max(end))),
        })
}

fn average_duration(records: &[CanonicalTripRecord]) -> Option<f64> {
    let durations: Vec<f64> = records.iter().filter_map(|r| r.duration_seconds).collect();
    if durations.is_empty() {
        None
    } else {
        Some(durations.iter().sum::<f64>() / durations.len() as f64)
    }
}

fn station_consistency(records: &[CanonicalTripRecord]) -> StationConsistency {
    let starts: BTreeSet<&str> = records
        .iter()
        .map(|r| r.start_station_id.as_str())
        .filter(|s| !s.is_empty())
        .collect();
    let ends: BTreeSet<&str> = records
        .iter()
        .map(|r| r.end_station_id.as_str())
        .filter(|s| !s.is_empty())
        .collect();

    StationConsistency {
        unique_start: starts.len(),
        unique_end: ends.len(),
        only_start: starts.difference(&ends).map(|s| s.to_string()).collect(),
        only_end: ends.difference(&starts).map(|s| s.to_string()).collect(),
    }
}

/// Busiest stations, named after the first name seen for each id
fn top_stations<F>(records: &[CanonicalTripRecord], station: F) -> Vec<StationCount>
where
    F: Fn(&CanonicalTripRecord) -> (&String, &String),
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut names: HashMap<&str, &str> = HashMap::new();

    for record in records {
        let (id, name) = station(record);
        if id.is_empty() {
            continue;
        }
        *counts.entry(id.as_str()).or_insert(0) += 1;
        names.entry(id.as_str()).or_insert(name.as_str());
    }

    top_counts(&counts, TOP_STATIONS)
        .into_iter()
        .map(|(id, trips)| StationCount {
            station_id: id.to_string(),
            station_name: names.get(id).copied().unwrap_or_default().to_string(),
            trips,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn trip(start: &str, end: &str, bike: &str, duration: f64) -> CanonicalTripRecord {
        let mut record = CanonicalTripRecord::new("t.csv");
        record.start_station_id = start.to_string();
        record.start_station_name = format!("Station {}", start);
        record.end_station_id = end.to_string();
        record.end_station_name = format!("Station {}", end);
        record.bike_id = bike.to_string();
        record.duration_seconds = Some(duration);
        record
    }

    #[test]
    fn test_entity_counts_and_ties() {
        let records = vec![
            trip("1", "2", "b1", 60.0),
            trip("1", "3", "b2", 120.0),
            trip("2", "3", "b1", 180.0),
            trip("4", "3", "b3", 240.0),
        ];

        let summary = TripSummary::from_records(&records, 6, 4, 2);

        let bikes = summary.entity("bike_id").unwrap();
        assert_eq!(bikes.unique_count, 3);
        // b2 and b3 tie on one trip; the lower value wins the last slot
        assert_eq!(
            bikes.top_values,
            vec![("b1".to_string(), 2), ("b2".to_string(), 1)]
        );

        let ends = summary.entity("end_station_id").unwrap();
        assert_eq!(ends.top_values[0], ("3".to_string(), 3));

        assert_eq!(summary.rows_dropped(), 2);
        assert_eq!(summary.average_duration_seconds, Some(150.0));
    }

    #[test]
    fn test_station_consistency() {
        let records = vec![
            trip("1", "2", "b1", 60.0),
            trip("2", "3", "b1", 60.0),
            trip("4", "", "b1", 60.0),
        ];

        let summary = TripSummary::from_records(&records, 3, 0, 15);

        assert_eq!(summary.stations.unique_start, 3);
        assert_eq!(summary.stations.unique_end, 2);
        assert_eq!(
            summary.stations.only_start,
            BTreeSet::from(["1".to_string(), "4".to_string()])
        );
        assert_eq!(summary.stations.only_end, BTreeSet::from(["3".to_string()]));
    }

    #[test]
    fn test_top_stations_use_first_name_seen() {
        let mut renamed = trip("1", "2", "b1", 60.0);
        renamed.start_station_name = "Renamed".to_string();
        let records = vec![trip("1", "2", "b1", 60.0), renamed, trip("5", "2", "b2", 60.0)];

        let summary = TripSummary::from_records(&records, 3, 0, 15);

        assert_eq!(
            summary.top_start_stations[0],
            StationCount {
                station_id: "1".to_string(),
                station_name: "Station 1".to_string(),
                trips: 2,
            }
        );
        assert_eq!(summary.top_end_stations.len(), 1);
    }

    #[test]
    fn test_date_range() {
        let mut a = trip("1", "2", "b1", 60.0);
        a.start_date = Some("2020-01-01 00:00".to_string());
        a.end_date = Some("2020-01-01 00:21".to_string());
        let mut b = trip("1", "2", "b1", 60.0);
        b.start_date = Some("2023-02-08 00:01".to_string());
        b.end_date = Some("2023-02-08 00:13".to_string());
        let mut c = trip("1", "2", "b1", 60.0);
        c.start_date = Some("garbage".to_string());

        let summary = TripSummary::from_records(&[a, b, c], 3, 2, 15);
        let (start, end) = summary.date_range.unwrap();
        assert_eq!(start.to_string(), "2020-01-01 00:00:00");
        assert_eq!(end.to_string(), "2023-02-08 00:13:00");
    }

    #[test]
    fn test_empty_summary() {
        let summary = TripSummary::from_records(&[], 0, 0, 15);
        assert_eq!(summary.average_duration_seconds, None);
        assert_eq!(summary.date_range, None);
        assert!(summary.top_start_stations.is_empty());
        assert!(summary.display_summary().contains("Kept 0 valid rows out of 0 total rows"));
    }
}
