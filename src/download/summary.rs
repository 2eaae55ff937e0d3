use crate::download::downloader::DownloadReport;
use crate::error::Result;
use crate::utils::constants::BYTES_PER_MB;
use crate::writers::TripWriter;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{error, info};

/// One line of `download_summary.csv`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadSummaryRow {
    pub filename: String,
    pub size_mb: f64,
    pub download_date: String,
}

/// Describe every CSV currently in `raw_dir`, sorted by filename
pub fn collect_download_summary(raw_dir: &Path) -> Result<Vec<DownloadSummaryRow>> {
    let mut rows = Vec::new();

    for entry in fs::read_dir(raw_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || path.extension().map_or(true, |ext| ext != "csv") {
            continue;
        }

        let metadata = entry.metadata()?;
        // Creation time is not available on every filesystem
        let stamp = metadata.created().or_else(|_| metadata.modified())?;
        let download_date = DateTime::<Local>::from(stamp).format("%Y-%m-%d").to_string();

        rows.push(DownloadSummaryRow {
            filename: entry.file_name().to_string_lossy().into_owned(),
            size_mb: round_2dp(metadata.len() as f64 / BYTES_PER_MB),
            download_date,
        });
    }

    rows.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(rows)
}

pub fn write_download_summary(rows: &[DownloadSummaryRow], path: &Path) -> Result<()> {
    TripWriter::new().write_rows(rows, path)?;

    let total_gb = rows.iter().map(|r| r.size_mb).sum::<f64>() / 1024.0;
    info!(
        files = rows.len(),
        total_gb = round_2dp(total_gb),
        path = %path.display(),
        "download summary created"
    );
    Ok(())
}

/// Write `download_summary.csv` for `raw_dir` unless the batch had no successes.
///
/// Returns whether the summary was written.
pub fn summarise_downloads(
    report: &DownloadReport,
    raw_dir: &Path,
    summary_path: &Path,
) -> Result<bool> {
    if report.success_count() == 0 {
        error!("no files were downloaded, skipping download summary");
        return Ok(false);
    }

    let rows = collect_download_summary(raw_dir)?;
    write_download_summary(&rows, summary_path)?;
    Ok(true)
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::downloader::{DownloadOutcome, DownloadResult};
    use chrono::Local;
    use tempfile::TempDir;

    #[test]
    fn test_collect_and_write_summary() -> Result<()> {
        let dir = TempDir::new()?;
        let raw = dir.path().join("raw");
        fs::create_dir_all(&raw)?;
        fs::write(raw.join("b.csv"), vec![b'x'; 3 * 1024 * 1024])?;
        fs::write(raw.join("a.csv"), b"Number\n")?;
        fs::write(raw.join("a.csv.part"), b"partial")?;
        fs::write(raw.join("notes.txt"), b"ignored")?;

        let rows = collect_download_summary(&raw)?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].filename, "a.csv");
        assert_eq!(rows[0].size_mb, 0.0);
        assert_eq!(rows[1].filename, "b.csv");
        assert_eq!(rows[1].size_mb, 3.0);
        assert_eq!(rows[1].download_date, Local::now().format("%Y-%m-%d").to_string());

        let summary_path = dir.path().join("download_summary.csv");
        write_download_summary(&rows, &summary_path)?;
        let contents = fs::read_to_string(&summary_path)?;
        assert!(contents.starts_with("filename,size_mb,download_date\n"));
        assert!(contents.contains("b.csv,3.0,"));
        Ok(())
    }

    #[test]
    fn test_no_summary_without_successes() -> Result<()> {
        let dir = TempDir::new()?;
        let raw = dir.path().join("raw");
        fs::create_dir_all(&raw)?;
        // Left over from an earlier run; must not be summarised on a failed batch
        fs::write(raw.join("old.csv"), b"Number\n")?;
        let summary_path = dir.path().join("download_summary.csv");

        let report = DownloadReport {
            results: vec![DownloadResult {
                filename: "stations.csv".to_string(),
                outcome: DownloadOutcome::Failed {
                    reason: "status code 404".to_string(),
                },
            }],
        };
        assert!(!summarise_downloads(&report, &raw, &summary_path)?);
        assert!(!summary_path.exists());

        let report = DownloadReport {
            results: vec![DownloadResult {
                filename: "old.csv".to_string(),
                outcome: DownloadOutcome::AlreadyPresent {
                    saved_as: "old.csv".to_string(),
                },
            }],
        };
        assert!(summarise_downloads(&report, &raw, &summary_path)?);
        assert!(summary_path.exists());
        Ok(())
    }

    #[test]
    fn test_round_2dp() {
        assert_eq!(round_2dp(1.23456), 1.23);
        assert_eq!(round_2dp(0.005), 0.01);
    }
}
