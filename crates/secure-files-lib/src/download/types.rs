use std::path::PathBuf;

/// A file that was written and passed checksum verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadedFile {
    pub name: String,
    pub path: PathBuf,
}

/// Outcome of a successful run, in listing order. Empty when nothing was listed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files: Vec<DownloadedFile>,
}
