use crate::error::Result;
use crate::models::{CanonicalTripRecord, CANONICAL_COLUMNS};
use crate::utils::partial_path;
use csv::{ReaderBuilder, WriterBuilder};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Details of a written table
#[derive(Debug, Clone)]
pub struct WrittenFileInfo {
    pub path: PathBuf,
    pub rows: usize,
    pub size_bytes: u64,
}

impl WrittenFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "File: {}\nRows: {}\nSize: {:.2} MB",
            self.path.display(),
            self.rows,
            self.size_bytes as f64 / (1024.0 * 1024.0)
        )
    }
}

/// Persists the canonical trip table as UTF-8 CSV with a header row.
///
/// Output goes to a `.part` sibling first and is renamed once complete, so a
/// file at the final path is always whole.
pub struct TripWriter;

impl TripWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_records(
        &self,
        records: &[CanonicalTripRecord],
        path: &Path,
    ) -> Result<WrittenFileInfo> {
        if records.is_empty() {
            // serde only emits the header alongside the first record
            return self.write_header_only(path);
        }
        self.write_rows(records, path)
    }

    /// Any serialisable rows, with the same write-then-rename guarantee
    pub fn write_rows<T: Serialize>(&self, rows: &[T], path: &Path) -> Result<WrittenFileInfo> {
        let partial = self.prepare(path)?;

        {
            let mut writer = WriterBuilder::new().from_path(&partial)?;
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }

        self.commit(&partial, path, rows.len())
    }

    pub fn read_records(&self, path: &Path) -> Result<Vec<CanonicalTripRecord>> {
        let mut reader = ReaderBuilder::new().from_path(path)?;

        let records = reader
            .deserialize()
            .collect::<std::result::Result<Vec<CanonicalTripRecord>, csv::Error>>()?;
        Ok(records)
    }

    fn write_header_only(&self, path: &Path) -> Result<WrittenFileInfo> {
        let partial = self.prepare(path)?;

        {
            let mut writer = WriterBuilder::new().from_path(&partial)?;
            writer.write_record(CANONICAL_COLUMNS)?;
            writer.flush()?;
        }

        self.commit(&partial, path, 0)
    }

    fn prepare(&self, path: &Path) -> Result<PathBuf> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(partial_path(path))
    }

    fn commit(&self, partial: &Path, path: &Path, rows: usize) -> Result<WrittenFileInfo> {
        fs::rename(partial, path)?;
        let size_bytes = fs::metadata(path)?.len();
        info!(path = %path.display(), rows, "wrote table");

        Ok(WrittenFileInfo {
            path: path.to_path_buf(),
            rows,
            size_bytes,
        })
    }
}

impl Default for TripWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Pretty-printed JSON, e.g. the structure report
pub fn write_json_report<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_record() -> CanonicalTripRecord {
        let mut record = CanonicalTripRecord::new("195JourneyDataExtract01Jan2020-07Jan2020.csv");
        record.start_date = Some("2020-01-01 00:00".to_string());
        record.end_date = Some("2020-01-01 00:21".to_string());
        record.start_station_id = "0307".to_string();
        record.start_station_name = "Black Lion Gate, Kensington Gardens".to_string();
        record.end_station_id = "14".to_string();
        record.end_station_name = "Belgrove Street , King's Cross".to_string();
        record.bike_id = "12033".to_string();
        record.duration_seconds = Some(1260.0);
        record
    }

    #[test]
    fn test_header_matches_canonical_columns() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("processed").join("clean_trips.csv");

        TripWriter::new().write_records(&[sample_record()], &path)?;

        let contents = fs::read_to_string(&path)?;
        let header = contents.lines().next().unwrap();
        assert_eq!(header, CANONICAL_COLUMNS.join(","));
        assert!(!partial_path(&path).exists());
        Ok(())
    }

    #[test]
    fn test_write_and_read_back() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("clean_trips.csv");

        let mut enriched = sample_record();
        enriched.set_calendar_fields(
            chrono::NaiveDate::from_ymd_opt(2020, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        );
        let records = vec![sample_record(), enriched];

        let writer = TripWriter::new();
        let info = writer.write_records(&records, &path)?;
        assert_eq!(info.rows, 2);
        assert!(info.size_bytes > 0);

        let read_back = writer.read_records(&path)?;
        assert_eq!(read_back, records);
        // Leading zeros survive as text
        assert_eq!(read_back[0].start_station_id, "0307");
        Ok(())
    }

    #[test]
    fn test_empty_table_still_has_header() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("empty.csv");

        let info = TripWriter::new().write_records(&[], &path)?;
        assert_eq!(info.rows, 0);
        assert_eq!(
            fs::read_to_string(&path)?.trim_end(),
            CANONICAL_COLUMNS.join(",")
        );
        Ok(())
    }
}
