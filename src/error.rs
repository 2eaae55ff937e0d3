use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unrecognised column layout in {file}")]
    UnknownSchema { file: String },

    #[error("Download of {filename} failed: {reason}")]
    DownloadFailed { filename: String, reason: String },

    #[error("No usable input: {0}")]
    NoUsableInput(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}
