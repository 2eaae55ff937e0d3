use crate::error::Result;
use crate::models::{FileStructureInfo, StructureGroup, StructureReport};
use crate::readers::TripReader;
use crate::utils::constants::INSPECT_SAMPLE_ROWS;
use crate::utils::file_name_of;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Pre-flight look at every source file before normalisation.
///
/// Purely diagnostic: nothing downstream reads the report, and an unreadable
/// file yields a degraded entry instead of an error.
pub struct StructureInspector {
    reader: TripReader,
    sample_rows: usize,
}

impl StructureInspector {
    pub fn new() -> Self {
        Self {
            reader: TripReader::new(),
            sample_rows: INSPECT_SAMPLE_ROWS,
        }
    }

    pub fn inspect(&self, paths: &[PathBuf]) -> StructureReport {
        let mut files = BTreeMap::new();

        for path in paths {
            let info = self.inspect_file(path);
            files.insert(info.filename.clone(), info);
        }

        let groups = group_by_signature(&files);
        if groups.len() > 1 {
            warn!(
                structures = groups.len(),
                "source files do not share one column structure"
            );
        }

        StructureReport { files, groups }
    }

    pub fn inspect_file(&self, path: &Path) -> FileStructureInfo {
        let filename = file_name_of(path);
        debug!(file = %filename, "inspecting");

        match self.try_inspect_file(path, &filename) {
            Ok(info) => info,
            Err(e) => {
                warn!(file = %filename, error = %e, "could not inspect file");
                FileStructureInfo::degraded(filename, e.to_string())
            }
        }
    }

    fn try_inspect_file(&self, path: &Path, filename: &str) -> Result<FileStructureInfo> {
        let sample = self.reader.read_sample(path, self.sample_rows)?;
        let row_count = self.reader.count_rows(path)?;
        let columns = sample.columns().to_vec();

        let has_duration = columns
            .iter()
            .any(|c| c.to_lowercase().contains("duration"));
        let has_rental_id = columns.iter().any(|c| {
            let lower = c.to_lowercase();
            lower == "rental id" || lower == "rental_id"
        });

        let sample_row = sample
            .rows()
            .next()
            .map(|row| {
                columns
                    .iter()
                    .map(|c| (c.clone(), row.text(c)))
                    .collect()
            })
            .unwrap_or_default();

        // A comma inside a sampled value means a quoted field that a naive split would break
        let suspicious_columns = columns
            .iter()
            .filter(|c| sample.rows().any(|row| row.get(c).is_some_and(|v| v.contains(','))))
            .cloned()
            .collect();

        Ok(FileStructureInfo {
            filename: filename.to_string(),
            num_columns: columns.len(),
            columns,
            has_duration,
            has_rental_id,
            row_count,
            sample_row,
            suspicious_columns,
            error: None,
        })
    }
}

impl Default for StructureInspector {
    fn default() -> Self {
        Self::new()
    }
}

/// Group filenames by exact column list, in first-seen order
fn group_by_signature(files: &BTreeMap<String, FileStructureInfo>) -> Vec<StructureGroup> {
    let mut groups: Vec<StructureGroup> = Vec::new();

    for (filename, info) in files {
        match groups.iter_mut().find(|g| g.columns == info.columns) {
            Some(group) => group.files.push(filename.clone()),
            None => groups.push(StructureGroup {
                columns: info.columns.clone(),
                files: vec![filename.clone()],
            }),
        }
    }

    groups
}
