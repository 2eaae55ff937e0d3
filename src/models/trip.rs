use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

/// Column order of the persisted canonical table
pub const CANONICAL_COLUMNS: [&str; 14] = [
    "source_file",
    "start_date",
    "end_date",
    "start_station_id",
    "start_station_name",
    "end_station_id",
    "end_station_name",
    "bike_id",
    "duration_seconds",
    "day_of_week",
    "hour_of_day",
    "month",
    "year",
    "month_name",
];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A trip in the unified layout shared by every source format.
///
/// Field order matches [`CANONICAL_COLUMNS`]; the CSV writer relies on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalTripRecord {
    pub source_file: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub start_station_id: String,
    pub start_station_name: String,
    pub end_station_id: String,
    pub end_station_name: String,
    pub bike_id: String,
    pub duration_seconds: Option<f64>,
    pub day_of_week: Option<String>,
    pub hour_of_day: Option<u32>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub month_name: Option<String>,
}

impl CanonicalTripRecord {
    /// Record with identity fields only; dates, duration and calendar fields start empty
    pub fn new(source_file: impl Into<String>) -> Self {
        Self {
            source_file: source_file.into(),
            start_date: None,
            end_date: None,
            start_station_id: String::new(),
            start_station_name: String::new(),
            end_station_id: String::new(),
            end_station_name: String::new(),
            bike_id: String::new(),
            duration_seconds: None,
            day_of_week: None,
            hour_of_day: None,
            month: None,
            year: None,
            month_name: None,
        }
    }

    /// Fill the derived calendar columns from a parsed start timestamp
    pub fn set_calendar_fields(&mut self, start: NaiveDateTime) {
        self.day_of_week = Some(weekday_name(start.weekday()).to_string());
        self.hour_of_day = Some(start.hour());
        self.month = Some(start.month());
        self.year = Some(start.year());
        self.month_name = Some(month_name(start.month()).to_string());
    }

    pub fn has_calendar_fields(&self) -> bool {
        self.day_of_week.is_some()
    }

    /// Strictly positive duration; null, NaN, zero and negative all fail
    pub fn has_positive_duration(&self) -> bool {
        self.duration_seconds.is_some_and(|d| d > 0.0)
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// English month name for 1-12; empty for anything else
pub fn month_name(month: u32) -> &'static str {
    match month {
        1..=12 => MONTH_NAMES[(month - 1) as usize],
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_calendar_fields() {
        let start = NaiveDate::from_ymd_opt(2022, 9, 14)
            .unwrap()
            .and_hms_opt(17, 45, 0)
            .unwrap();

        let mut record = CanonicalTripRecord::new("a.csv");
        assert!(!record.has_calendar_fields());

        record.set_calendar_fields(start);
        assert_eq!(record.day_of_week.as_deref(), Some("Wednesday"));
        assert_eq!(record.hour_of_day, Some(17));
        assert_eq!(record.month, Some(9));
        assert_eq!(record.month_name.as_deref(), Some("September"));
        assert_eq!(record.year, Some(2022));
    }

    #[test]
    fn test_positive_duration() {
        let mut record = CanonicalTripRecord::new("a.csv");
        assert!(!record.has_positive_duration());

        for (value, expected) in [(60.0, true), (0.0, false), (-5.0, false), (f64::NAN, false)] {
            record.duration_seconds = Some(value);
            assert_eq!(record.has_positive_duration(), expected, "duration {}", value);
        }
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(13), "");
    }
}
