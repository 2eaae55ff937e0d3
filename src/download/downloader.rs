use crate::download::fetcher::Fetcher;
use crate::error::{ProcessingError, Result};
use crate::utils::constants::BYTES_PER_MB;
use crate::utils::progress::ProgressReporter;
use crate::utils::{alternate_journey_filename, partial_path};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum DownloadOutcome {
    /// Found on disk under `saved_as`; no request was made
    AlreadyPresent { saved_as: String },
    Downloaded { saved_as: String, size_bytes: u64 },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DownloadResult {
    pub filename: String,
    pub outcome: DownloadOutcome,
}

impl DownloadResult {
    pub fn is_success(&self) -> bool {
        !matches!(self.outcome, DownloadOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, Default)]
pub struct DownloadReport {
    pub results: Vec<DownloadResult>,
}

impl DownloadReport {
    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &DownloadResult> {
        self.results.iter().filter(|r| !r.is_success())
    }

    pub fn downloaded_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, DownloadOutcome::Downloaded { .. }))
            .count()
    }

    pub fn display_summary(&self) -> String {
        let mut summary = format!(
            "Successfully downloaded {} of {} files ({} fetched, {} already present)\n",
            self.success_count(),
            self.results.len(),
            self.downloaded_count(),
            self.success_count() - self.downloaded_count()
        );

        for failure in self.failures() {
            if let DownloadOutcome::Failed { reason } = &failure.outcome {
                summary.push_str(&format!("  ✗ {}: {}\n", failure.filename, reason));
            }
        }

        summary
    }
}

/// Fetches a fixed list of files into one directory on a bounded worker pool.
///
/// Files already on disk (under either name) are skipped before any request,
/// so reruns only fetch what is missing. Each worker owns its target path.
pub struct Downloader<F: Fetcher> {
    fetcher: F,
    base_url: String,
    raw_dir: PathBuf,
    workers: usize,
}

impl<F: Fetcher> Downloader<F> {
    pub fn new(fetcher: F, base_url: &str, raw_dir: &Path, workers: usize) -> Self {
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };

        Self {
            fetcher,
            base_url,
            raw_dir: raw_dir.to_path_buf(),
            workers: workers.max(1),
        }
    }

    pub fn download_all(
        &self,
        filenames: &[&str],
        progress: &ProgressReporter,
    ) -> Result<DownloadReport> {
        fs::create_dir_all(&self.raw_dir)?;
        info!(
            files = filenames.len(),
            workers = self.workers,
            "starting download"
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|e| ProcessingError::ThreadPool(e.to_string()))?;

        let results: Vec<DownloadResult> = pool.install(|| {
            filenames
                .par_iter()
                .map(|filename| {
                    let result = self.download_file(filename);
                    progress.increment();
                    result
                })
                .collect()
        });

        let report = DownloadReport { results };
        info!(
            succeeded = report.success_count(),
            total = filenames.len(),
            "download finished"
        );
        Ok(report)
    }

    /// Primary name first, then the alternate name once; never more than two requests
    pub fn download_file(&self, filename: &str) -> DownloadResult {
        let alternate = alternate_journey_filename(filename);

        for candidate in std::iter::once(filename).chain(alternate.as_deref()) {
            if self.raw_dir.join(candidate).exists() {
                info!(file = candidate, "file already exists");
                return DownloadResult {
                    filename: filename.to_string(),
                    outcome: DownloadOutcome::AlreadyPresent {
                        saved_as: candidate.to_string(),
                    },
                };
            }
        }

        let outcome = match self.attempt(filename) {
            Ok(size_bytes) => DownloadOutcome::Downloaded {
                saved_as: filename.to_string(),
                size_bytes,
            },
            Err(primary_error) => {
                warn!(file = filename, error = %primary_error, "download failed");

                match alternate {
                    Some(alt) => {
                        info!(file = %alt, "trying alternative filename");
                        match self.attempt(&alt) {
                            Ok(size_bytes) => DownloadOutcome::Downloaded {
                                saved_as: alt,
                                size_bytes,
                            },
                            Err(alt_error) => DownloadOutcome::Failed {
                                reason: format!("{}; alternative {}: {}", primary_error, alt, alt_error),
                            },
                        }
                    }
                    None => DownloadOutcome::Failed {
                        reason: primary_error.to_string(),
                    },
                }
            }
        };

        if let DownloadOutcome::Failed { reason } = &outcome {
            error!(file = filename, reason = %reason, "giving up on file");
        }

        DownloadResult {
            filename: filename.to_string(),
            outcome,
        }
    }

    /// One GET; writes through a `.part` file and returns the saved size
    fn attempt(&self, filename: &str) -> Result<u64> {
        let url = format!("{}{}", self.base_url, filename);
        info!(url = %url, "downloading");

        let response = self.fetcher.fetch(&url)?;
        if !response.is_success() {
            return Err(ProcessingError::DownloadFailed {
                filename: filename.to_string(),
                reason: format!("status code {}", response.status),
            });
        }

        let target = self.raw_dir.join(filename);
        let partial = partial_path(&target);
        fs::write(&partial, &response.body)?;
        fs::rename(&partial, &target)?;

        let size_bytes = response.body.len() as u64;
        info!(
            file = filename,
            size_mb = size_bytes as f64 / BYTES_PER_MB,
            "successfully downloaded"
        );
        Ok(size_bytes)
    }
}
