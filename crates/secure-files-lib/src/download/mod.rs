#[allow(clippy::module_inception)]
mod download;
mod path;
mod types;

pub use download::{Downloader, run};
pub use path::{resolve, secure_join};
pub use types::{DownloadedFile, RunSummary};
