use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What the pre-flight inspection learned about one source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileStructureInfo {
    pub filename: String,
    pub columns: Vec<String>,
    pub num_columns: usize,
    pub has_duration: bool,
    pub has_rental_id: bool,
    pub row_count: usize,
    pub sample_row: Vec<(String, String)>,
    pub suspicious_columns: Vec<String>,
    pub error: Option<String>,
}

impl FileStructureInfo {
    /// Placeholder for a file that could not be read; keeps the batch going
    pub fn degraded(filename: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            columns: Vec::new(),
            num_columns: 0,
            has_duration: false,
            has_rental_id: false,
            row_count: 0,
            sample_row: Vec::new(),
            suspicious_columns: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Files sharing one exact column signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureGroup {
    pub columns: Vec<String>,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructureReport {
    pub files: BTreeMap<String, FileStructureInfo>,
    pub groups: Vec<StructureGroup>,
}

impl StructureReport {
    pub fn is_consistent(&self) -> bool {
        self.groups.len() <= 1
    }

    pub fn get(&self, filename: &str) -> Option<&FileStructureInfo> {
        self.files.get(filename)
    }

    pub fn display_summary(&self) -> String {
        let mut summary = String::from("=== Source File Structure ===\n");

        if self.is_consistent() {
            summary.push_str("All files have consistent column structures\n");
        } else {
            summary.push_str(&format!(
                "WARNING: Not all files have the same column structure! Found {} different column structures\n",
                self.groups.len()
            ));

            for (i, group) in self.groups.iter().enumerate() {
                summary.push_str(&format!(
                    "\nStructure Group {} ({} files):\n  Columns ({}): {}\n",
                    i + 1,
                    group.files.len(),
                    group.columns.len(),
                    group.columns.join(", ")
                ));

                let examples: Vec<&str> = group.files.iter().take(3).map(String::as_str).collect();
                let more = if group.files.len() > 3 { "..." } else { "" };
                summary.push_str(&format!("  Example files: {}{}\n", examples.join(", "), more));
            }
        }

        summary.push_str("\nDetailed file information:\n");
        for (filename, info) in &self.files {
            summary.push_str(&format!("\n{}:\n", filename));

            if let Some(error) = &info.error {
                summary.push_str(&format!("  Error: {}\n", error));
                continue;
            }

            summary.push_str(&format!(
                "  Columns ({}): {}\n  Row count: {}\n",
                info.num_columns,
                info.columns.join(", "),
                info.row_count
            ));

            if !info.suspicious_columns.is_empty() {
                summary.push_str(&format!(
                    "  Suspicious columns (may contain commas): {}\n",
                    info.suspicious_columns.join(", ")
                ));
            }

            summary.push_str("  Sample row:\n");
            for (column, value) in &info.sample_row {
                summary.push_str(&format!("    {}: {}\n", column, value));
            }
        }

        summary
    }
}
