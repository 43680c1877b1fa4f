use super::types::SecureFileRecord;
use crate::config::DownloadContext;
use crate::error::SecureFilesError;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

pub(crate) const PAGE_SIZE: u32 = 100;
const NEXT_PAGE_HEADER: &str = "x-next-page";

/// Authenticated client for the two secure file endpoints of one project.
#[derive(Clone, Debug)]
pub struct SecureFilesClient {
    http: reqwest::Client,
    secure_files_url: String,
}

impl SecureFilesClient {
    pub fn new(context: &DownloadContext) -> Result<Self, SecureFilesError> {
        let name = HeaderName::from_bytes(context.auth.header_name().as_bytes())
            .map_err(|_| SecureFilesError::InvalidAuthToken)?;
        let mut value = HeaderValue::from_str(context.auth.value())
            .map_err(|_| SecureFilesError::InvalidAuthToken)?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(name, value);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("download-secure-files/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| SecureFilesError::Transport {
                url: context.api_url.clone(),
                source,
            })?;

        Ok(Self {
            http,
            secure_files_url: context.secure_files_url(),
        })
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response, SecureFilesError> {
        tracing::trace!(url = %url, "GET");
        let response =
            self.http
                .get(url)
                .send()
                .await
                .map_err(|source| SecureFilesError::Transport {
                    url: url.to_string(),
                    source,
                })?;

        if response.status() != StatusCode::OK {
            return Err(SecureFilesError::HttpStatus {
                url: url.to_string(),
                status: response.status(),
            });
        }

        Ok(response)
    }

    async fn read_body(url: &str, response: reqwest::Response) -> Result<Vec<u8>, SecureFilesError> {
        let body = response
            .bytes()
            .await
            .map_err(|source| SecureFilesError::Transport {
                url: url.to_string(),
                source,
            })?;
        Ok(body.to_vec())
    }

    /// Fetches `url` and returns the whole body. Anything but `200 OK` is an error.
    pub async fn get(&self, url: &str) -> Result<Vec<u8>, SecureFilesError> {
        let response = self.send(url).await?;
        Self::read_body(url, response).await
    }

    pub fn list_url(&self, page: u32) -> String {
        format!(
            "{}?per_page={}&page={}",
            self.secure_files_url, PAGE_SIZE, page
        )
    }

    pub fn download_url(&self, id: u64) -> String {
        format!("{}/{}/download", self.secure_files_url, id)
    }

    /// Lists every secure file of the project, following `X-Next-Page` across pages.
    ///
    /// A body that is not a JSON array of records fails the whole listing.
    pub async fn list_secure_files(&self) -> Result<Vec<SecureFileRecord>, SecureFilesError> {
        let mut records = Vec::new();
        let mut page = Some(1u32);

        while let Some(current) = page {
            let url = self.list_url(current);
            let response = self.send(&url).await?;

            // Only move forward, so a misbehaving server cannot loop us.
            let next_page = response
                .headers()
                .get(NEXT_PAGE_HEADER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u32>().ok())
                .filter(|next| *next > current);

            let body = Self::read_body(&url, response).await?;
            let batch: Vec<SecureFileRecord> = serde_json::from_slice(&body)
                .map_err(|source| SecureFilesError::Decode {
                    url: url.clone(),
                    source,
                })?;

            tracing::debug!(page = current, count = batch.len(), "Fetched secure file list page");
            if batch.is_empty() {
                break;
            }
            records.extend(batch);
            page = next_page;
        }

        Ok(records)
    }

    pub async fn download(&self, record: &SecureFileRecord) -> Result<Vec<u8>, SecureFilesError> {
        self.get(&self.download_url(record.id)).await
    }
}
