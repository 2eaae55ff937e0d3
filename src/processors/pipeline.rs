use crate::error::{ProcessingError, Result};
use crate::models::{CanonicalTripRecord, StructureReport};
use crate::processors::{AggregationResult, Aggregator, SchemaNormalizer};
use crate::readers::TripReader;
use crate::schema::{detect_variant, SchemaVariant, StructureInspector};
use crate::utils::constants::{DEFAULT_TOP_N, PARTIAL_SUFFIX};
use crate::utils::file_name_of;
use crate::utils::progress::ProgressReporter;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// A source file that made it into the combined table
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedFile {
    pub source_file: String,
    pub variant: SchemaVariant,
    pub rows: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    UnknownSchema,
    ReadFailed(String),
}

/// A source file left out of the combined table, and why
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFile {
    pub source_file: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
pub struct CleaningOutcome {
    pub processed: Vec<ProcessedFile>,
    pub skipped: Vec<SkippedFile>,
    pub aggregation: AggregationResult,
}

impl CleaningOutcome {
    pub fn records(&self) -> &[CanonicalTripRecord] {
        &self.aggregation.records
    }

    pub fn display_summary(&self) -> String {
        let mut summary = String::from("=== Cleaning Report ===\n");
        summary.push_str(&format!(
            "Processed files: {}\nSkipped files: {}\n",
            self.processed.len(),
            self.skipped.len()
        ));

        for file in &self.processed {
            summary.push_str(&format!(
                "  ✓ {} [{}]: {} rows\n",
                file.source_file, file.variant, file.rows
            ));
        }
        for file in &self.skipped {
            let reason = match &file.reason {
                SkipReason::UnknownSchema => "unknown file format".to_string(),
                SkipReason::ReadFailed(e) => format!("read failed: {}", e),
            };
            summary.push_str(&format!("  ✗ {}: {}\n", file.source_file, reason));
        }

        summary.push('\n');
        summary.push_str(&self.aggregation.summary.display_summary());
        summary
    }
}

/// Sequential inspect -> detect -> normalise -> aggregate over a batch of extracts.
///
/// Failures stay at the file they happened in; the batch only fails when no
/// file at all could be normalised.
pub struct CleaningPipeline {
    reader: TripReader,
    normalizer: SchemaNormalizer,
    inspector: StructureInspector,
    top_n: usize,
}

impl CleaningPipeline {
    pub fn new() -> Self {
        Self {
            reader: TripReader::new(),
            normalizer: SchemaNormalizer::new(),
            inspector: StructureInspector::new(),
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// CSV files directly under `dir`, sorted by name; in-flight downloads are ignored
    pub fn discover_input_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            let is_partial = path.to_string_lossy().ends_with(PARTIAL_SUFFIX);

            if path.is_file() && is_csv && !is_partial {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }

    pub fn inspect(&self, paths: &[PathBuf]) -> StructureReport {
        self.inspector.inspect(paths)
    }

    /// Read, classify and normalise one file
    pub fn normalize_file(&self, path: &Path) -> Result<(SchemaVariant, Vec<CanonicalTripRecord>)> {
        let source_file = file_name_of(path);
        let table = self.reader.read_table(path)?;
        let variant = detect_variant(table.columns());
        if table.is_empty() {
            debug!(file = %source_file, "file has a header but no data rows");
        }

        let records = self.normalizer.normalize(&table, variant, &source_file)?;
        Ok((variant, records))
    }

    pub fn run(&self, paths: &[PathBuf], progress: &ProgressReporter) -> Result<CleaningOutcome> {
        let mut processed = Vec::new();
        let mut skipped = Vec::new();
        let mut tables = Vec::new();

        for path in paths {
            let source_file = file_name_of(path);
            progress.set_message(&format!("Processing {}", source_file));

            match self.normalize_file(path) {
                Ok((variant, records)) => {
                    info!(file = %source_file, %variant, rows = records.len(), "normalised");
                    processed.push(ProcessedFile {
                        source_file,
                        variant,
                        rows: records.len(),
                    });
                    tables.push(records);
                }
                Err(ProcessingError::UnknownSchema { file }) => {
                    warn!(file = %file, "unknown file format, skipping");
                    skipped.push(SkippedFile {
                        source_file,
                        reason: SkipReason::UnknownSchema,
                    });
                }
                Err(e) => {
                    error!(file = %source_file, error = %e, "could not read file, skipping");
                    skipped.push(SkippedFile {
                        source_file,
                        reason: SkipReason::ReadFailed(e.to_string()),
                    });
                }
            }

            progress.increment();
        }

        if tables.is_empty() {
            return Err(ProcessingError::NoUsableInput(format!(
                "none of {} input files could be normalised",
                paths.len()
            )));
        }

        progress.set_message("Combining normalised tables");
        let aggregation = Aggregator::with_top_n(self.top_n).aggregate(tables);
        progress.finish_with_message(&format!(
            "Cleaned {} trips from {} files",
            aggregation.records.len(),
            processed.len()
        ));

        Ok(CleaningOutcome {
            processed,
            skipped,
            aggregation,
        })
    }
}

impl Default for CleaningPipeline {
    fn default() -> Self {
        Self::new()
    }
}
