use crate::error::Result;
use crate::models::RawTripTable;
use csv::{ByteRecord, Reader, ReaderBuilder};
use encoding_rs::WINDOWS_1252;
use std::fs::File;
use std::path::Path;
use tracing::warn;

const UTF8_BOM: char = '\u{feff}';

/// Reads journey extract CSVs into header-addressed text tables.
///
/// Station names carry commas, so fields are quote-aware; rows with a ragged
/// field count are kept and read short. Cells that are not valid UTF-8 are
/// decoded as Windows-1252, which is what the older extracts were exported in.
/// Quotes inside quoted fields may be doubled or backslash-escaped. Rows with
/// more fields than the header are skipped with a warning.
pub struct TripReader;

impl TripReader {
    pub fn new() -> Self {
        Self
    }

    /// Read the whole file
    pub fn read_table(&self, path: &Path) -> Result<RawTripTable> {
        self.read_table_limited(path, None)
    }

    /// Read the header and at most `limit` rows
    pub fn read_sample(&self, path: &Path, limit: usize) -> Result<RawTripTable> {
        self.read_table_limited(path, Some(limit))
    }

    /// Count readable data rows without decoding any field
    pub fn count_rows(&self, path: &Path) -> Result<usize> {
        let mut reader = self.open(path)?;
        let width = reader.byte_headers()?.len();
        let mut record = ByteRecord::new();
        let mut count = 0;

        while reader.read_byte_record(&mut record)? {
            if record.len() <= width {
                count += 1;
            }
        }

        Ok(count)
    }

    fn read_table_limited(&self, path: &Path, limit: Option<usize>) -> Result<RawTripTable> {
        let mut reader = self.open(path)?;

        let columns: Vec<String> = reader
            .byte_headers()?
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let name = decode_field(field);
                let name = if i == 0 {
                    name.trim_start_matches(UTF8_BOM).to_string()
                } else {
                    name
                };
                name.trim().to_string()
            })
            .collect();

        let mut rows = Vec::new();
        let mut record = ByteRecord::new();

        while limit.map_or(true, |l| rows.len() < l) && reader.read_byte_record(&mut record)? {
            if record.len() > columns.len() {
                warn!(
                    file = %path.display(),
                    line = record.position().map(|p| p.line()),
                    fields = record.len(),
                    expected = columns.len(),
                    "skipping row with too many fields"
                );
                continue;
            }
            rows.push(record.iter().map(decode_field).collect());
        }

        Ok(RawTripTable::new(columns, rows))
    }

    fn open(&self, path: &Path) -> Result<Reader<File>> {
        let reader = ReaderBuilder::new()
            .flexible(true)
            .escape(Some(b'\\'))
            .has_headers(true)
            .from_path(path)?;
        Ok(reader)
    }
}

impl Default for TripReader {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_field(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => WINDOWS_1252.decode(bytes).0.into_owned(),
    }
}
