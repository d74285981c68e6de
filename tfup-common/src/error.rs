use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum TfupError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("HTTP Request Error: {0}")]
    Http(#[from] Arc<reqwest::Error>),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("Semantic Versioning Error: {0}")]
    SemVer(#[from] Arc<semver::Error>),

    #[error("Validation Error: {0}")]
    Validation(String),

    #[error("Resolution Error: {0}")]
    Resolution(String),

    #[error("Checksum Missing: {0}")]
    ChecksumMissing(String),

    #[error("Checksum Mismatch: {0}")]
    ChecksumMismatch(String),

    #[error("Placement Error: {0}")]
    Placement(String),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("API Error: {0}")]
    Api(String),

    #[error("DownloadError: Failed to download '{0}' from '{1}': {2}")]
    DownloadError(String, String, String),

    #[error("Resource Not Found: {0}")]
    NotFound(String),

    #[error("Failed to execute command: {0}")]
    CommandExec(String),

    #[error("Generic Error: {0}")]
    Generic(String),
}

impl From<std::io::Error> for TfupError {
    fn from(err: std::io::Error) -> Self {
        TfupError::Io(Arc::new(err))
    }
}

impl From<reqwest::Error> for TfupError {
    fn from(err: reqwest::Error) -> Self {
        TfupError::Http(Arc::new(err))
    }
}

impl From<serde_json::Error> for TfupError {
    fn from(err: serde_json::Error) -> Self {
        TfupError::Json(Arc::new(err))
    }
}

impl From<semver::Error> for TfupError {
    fn from(err: semver::Error) -> Self {
        TfupError::SemVer(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, TfupError>;
