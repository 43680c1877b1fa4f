mod loader;
mod model;

pub use loader::{EnvVars, load_settings, load_settings_from};
pub use model::{
    AuthToken, DEFAULT_API_URL, DEFAULT_DOWNLOAD_PATH, DownloadContext, MismatchPolicy, Settings,
    SettingsOverrides,
};

use crate::download::secure_join;
use crate::error::SecureFilesError;
use std::path::{Path, PathBuf};

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Escapes a project identifier the way a query component is escaped, so
/// `group/project` becomes `group%2Fproject`.
pub fn escape_project_id(project_id: &str) -> String {
    url::form_urlencoded::byte_serialize(project_id.as_bytes()).collect()
}

fn auth_token(settings: &Settings) -> Result<AuthToken, SecureFilesError> {
    if let Some(token) = non_empty(settings.ci_job_token.clone()) {
        Ok(AuthToken::Job(token))
    } else if let Some(token) = non_empty(settings.private_token.clone()) {
        Ok(AuthToken::Private(token))
    } else {
        Err(SecureFilesError::MissingAuthToken)
    }
}

fn api_url(settings: &Settings) -> Result<String, SecureFilesError> {
    let raw = non_empty(settings.ci_api_v4_url.clone())
        .unwrap_or_else(|| model::DEFAULT_API_URL.to_string());
    let trimmed = raw.trim().trim_end_matches('/').to_string();

    let parsed = url::Url::parse(&trimmed).map_err(|e| SecureFilesError::InvalidApiUrl {
        url: raw.clone(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(SecureFilesError::InvalidApiUrl {
            url: raw,
            reason: format!("unsupported scheme {}", parsed.scheme()),
        });
    }

    Ok(trimmed)
}

fn download_root(
    settings: &Settings,
    working_directory: &Path,
) -> Result<PathBuf, SecureFilesError> {
    let download_path = non_empty(settings.secure_files_download_path.clone())
        .unwrap_or_else(|| model::DEFAULT_DOWNLOAD_PATH.to_string());

    // Absolute paths are refused along with `..` escapes.
    secure_join(working_directory, &download_path).map_err(|_| {
        SecureFilesError::DownloadPathEscape {
            path: download_path,
            working_directory: working_directory.to_path_buf(),
        }
    })
}

impl DownloadContext {
    pub fn from_settings(
        settings: Settings,
        working_directory: impl Into<PathBuf>,
    ) -> Result<Self, SecureFilesError> {
        let working_directory = working_directory.into();

        let auth = auth_token(&settings)?;
        let project_id = non_empty(settings.ci_project_id.clone())
            .map(|id| escape_project_id(id.trim()))
            .ok_or(SecureFilesError::MissingProjectId)?;
        let api_url = api_url(&settings)?;
        let download_root = download_root(&settings, &working_directory)?;
        let mismatch_policy = match settings.secure_files_keep_mismatched.as_deref() {
            Some(value) if is_truthy(value) => MismatchPolicy::Keep,
            _ => MismatchPolicy::Remove,
        };

        Ok(Self {
            api_url,
            project_id,
            auth,
            download_root,
            working_directory,
            mismatch_policy,
        })
    }

    pub fn secure_files_url(&self) -> String {
        format!("{}/projects/{}/secure_files", self.api_url, self.project_id)
    }
}
