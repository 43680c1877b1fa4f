use crate::config::DownloadContext;

#[derive(Debug, Clone)]
pub struct DownloadParams {
    pub context: DownloadContext,
}
