use super::path::resolve;
use super::types::{DownloadedFile, RunSummary};
use crate::api::{SecureFileRecord, SecureFilesClient};
use crate::config::{DownloadContext, MismatchPolicy};
use crate::error::SecureFilesError;
use crate::verification::verify_file;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

/// Downloads the secure files of one project into the context's download root.
pub struct Downloader<'a> {
    context: &'a DownloadContext,
    client: SecureFilesClient,
}

async fn write_file(data: &[u8], path: &Path) -> Result<(), SecureFilesError> {
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|e| SecureFilesError::io(path, e))?;
    file.write_all(data)
        .await
        .map_err(|e| SecureFilesError::io(path, e))?;
    file.flush()
        .await
        .map_err(|e| SecureFilesError::io(path, e))?;
    Ok(())
}

impl<'a> Downloader<'a> {
    pub fn new(context: &'a DownloadContext) -> Result<Self, SecureFilesError> {
        Ok(Self {
            context,
            client: SecureFilesClient::new(context)?,
        })
    }

    pub async fn list(&self) -> Result<Vec<SecureFileRecord>, SecureFilesError> {
        self.client.list_secure_files().await
    }

    /// Resolves, fetches, writes and verifies a single record. Any failing step aborts.
    pub async fn materialize(
        &self,
        record: &SecureFileRecord,
    ) -> Result<DownloadedFile, SecureFilesError> {
        let path = resolve(&self.context.download_root, &record.name)?;
        tracing::debug!(file = %record.name, id = record.id, path = %path.display(), "Fetching");

        let body = self.client.download(record).await?;
        write_file(&body, &path).await?;

        if let Err(err) = verify_file(record, &path).await {
            if matches!(err, SecureFilesError::ChecksumMismatch { .. })
                && self.context.mismatch_policy == MismatchPolicy::Remove
            {
                if let Err(remove_err) = tokio::fs::remove_file(&path).await {
                    warn!(path = %path.display(), "Failed to remove file with bad checksum: {}", remove_err);
                }
            }
            return Err(err);
        }

        let display_path = path
            .strip_prefix(&self.context.working_directory)
            .unwrap_or(&path);
        info!("{} downloaded to {}", record.name, display_path.display());

        Ok(DownloadedFile {
            name: record.name.clone(),
            path,
        })
    }

    /// Lists the project's files and materializes each one in order, stopping at the first error.
    pub async fn run(&self) -> Result<RunSummary, SecureFilesError> {
        let records = self.list().await?;
        if records.is_empty() {
            info!("No secure files to download");
            return Ok(RunSummary::default());
        }

        let root = &self.context.download_root;
        std::fs::create_dir_all(root).map_err(|e| SecureFilesError::io(root, e))?;
        info!(
            "Downloading Secure Files (v{}) to {}",
            env!("CARGO_PKG_VERSION"),
            root.display()
        );

        let mut summary = RunSummary::default();
        for record in &records {
            summary.files.push(self.materialize(record).await?);
        }

        info!("Downloaded {} secure files", summary.files.len());
        Ok(summary)
    }
}

pub async fn run(context: &DownloadContext) -> Result<RunSummary, SecureFilesError> {
    Downloader::new(context)?.run().await
}
