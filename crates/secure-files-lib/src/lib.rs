pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod verification;

pub use config::DownloadContext;
pub use error::SecureFilesError;
