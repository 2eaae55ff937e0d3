use crate::error::{ProcessingError, Result};
use crate::models::{CanonicalTripRecord, RawTripRecord, RawTripTable};
use crate::processors::duration::parse_duration_field;
use crate::schema::{new_format, old_format, SchemaVariant};
use crate::utils::constants::{CANONICAL_DATETIME_FORMAT, OLD_FORMAT_DATETIME};
use chrono::NaiveDateTime;

/// Maps each known source layout onto [`CanonicalTripRecord`].
///
/// Emits exactly one record per input row. Unreadable dates and durations
/// become `None`; dropping rows is left to the aggregator.
pub struct SchemaNormalizer;

impl SchemaNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(
        &self,
        table: &RawTripTable,
        variant: SchemaVariant,
        source_file: &str,
    ) -> Result<Vec<CanonicalTripRecord>> {
        let map_row: fn(&RawTripRecord<'_>, &str) -> CanonicalTripRecord = match variant {
            SchemaVariant::NewFormat => normalize_new_format_row,
            SchemaVariant::OldFormat => normalize_old_format_row,
            SchemaVariant::Unknown => {
                return Err(ProcessingError::UnknownSchema {
                    file: source_file.to_string(),
                })
            }
        };

        Ok(table.rows().map(|row| map_row(&row, source_file)).collect())
    }
}

impl Default for SchemaNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Dates are already `YYYY-MM-DD HH:MM` and pass through; duration is text like `14m 30s`
fn normalize_new_format_row(row: &RawTripRecord<'_>, source_file: &str) -> CanonicalTripRecord {
    let mut record = CanonicalTripRecord::new(source_file);

    record.start_date = row.get(new_format::START_DATE).map(str::to_string);
    record.end_date = row.get(new_format::END_DATE).map(str::to_string);
    record.start_station_id = row.text(new_format::START_STATION_ID);
    record.start_station_name = row.text(new_format::START_STATION_NAME);
    record.end_station_id = row.text(new_format::END_STATION_ID);
    record.end_station_name = row.text(new_format::END_STATION_NAME);
    record.bike_id = row.text(new_format::BIKE_ID);
    record.duration_seconds = parse_duration_field(row.get(new_format::DURATION));

    record
}

/// Dates are `DD/MM/YYYY HH:MM` and get rewritten; duration is already whole seconds
fn normalize_old_format_row(row: &RawTripRecord<'_>, source_file: &str) -> CanonicalTripRecord {
    let mut record = CanonicalTripRecord::new(source_file);

    record.start_date = row.get(old_format::START_DATE).and_then(reformat_old_date);
    record.end_date = row.get(old_format::END_DATE).and_then(reformat_old_date);
    record.start_station_id = row.text(old_format::START_STATION_ID);
    record.start_station_name = row.text(old_format::START_STATION_NAME);
    record.end_station_id = row.text(old_format::END_STATION_ID);
    record.end_station_name = row.text(old_format::END_STATION_NAME);
    record.bike_id = row.text(old_format::BIKE_ID);
    record.duration_seconds = row
        .get(old_format::DURATION)
        .and_then(|d| d.parse::<f64>().ok())
        .filter(|d| !d.is_nan());

    record
}

fn reformat_old_date(value: &str) -> Option<String> {
    NaiveDateTime::parse_from_str(value, OLD_FORMAT_DATETIME)
        .ok()
        .map(|dt| dt.format(CANONICAL_DATETIME_FORMAT).to_string())
}
