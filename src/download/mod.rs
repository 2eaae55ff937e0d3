pub mod downloader;
pub mod fetcher;
pub mod summary;

pub use downloader::{DownloadOutcome, DownloadReport, DownloadResult, Downloader};
pub use fetcher::{FetchResponse, Fetcher, HttpFetcher};
pub use summary::{
    collect_download_summary, summarise_downloads, write_download_summary, DownloadSummaryRow,
};
