use crate::cli::params::DownloadParams;
use crate::download::{RunSummary, run};
use crate::error::SecureFilesError;

pub async fn run_download(params: DownloadParams) -> Result<RunSummary, SecureFilesError> {
    let DownloadParams { context } = params;

    tracing::info!(
        "Fetching secure files for project {} from {}",
        context.project_id,
        context.api_url
    );
    let summary = run(&context).await?;

    tracing::info!("Secure files download completed successfully");
    Ok(summary)
}
