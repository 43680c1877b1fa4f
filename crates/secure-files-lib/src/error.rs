use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SecureFilesError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Authentication token missing: set CI_JOB_TOKEN or PRIVATE_TOKEN")]
    MissingAuthToken,

    #[error("Authentication token contains characters not allowed in an HTTP header")]
    InvalidAuthToken,

    #[error("Project ID missing: set CI_PROJECT_ID")]
    MissingProjectId,

    #[error("Invalid API URL {url}: {reason}")]
    InvalidApiUrl { url: String, reason: String },

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned bad status: {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error(
        "Download path {path:?} (SECURE_FILES_DOWNLOAD_PATH) must be a relative path inside the working directory {}",
        .working_directory.display()
    )]
    DownloadPathEscape {
        path: String,
        working_directory: PathBuf,
    },

    #[error("Secure file name {name:?} does not resolve to a file inside {}", .root.display())]
    PathEscape { name: String, root: PathBuf },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failure validating checksum for {file_name}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        file_name: String,
        expected: String,
        actual: String,
    },

    #[error("Failed to decode secure file list from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("CLI argument validation failed: {details}")]
    CliArgumentValidation { details: String },
}

impl SecureFilesError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
