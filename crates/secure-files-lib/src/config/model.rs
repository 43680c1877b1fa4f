use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "https://gitlab.com/api/v4";
pub const DEFAULT_DOWNLOAD_PATH: &str = ".secure_files";

/// Raw values read from the environment, one field per variable.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Settings {
    pub ci_api_v4_url: Option<String>,
    pub ci_project_id: Option<String>,
    pub ci_job_token: Option<String>,
    pub private_token: Option<String>,
    pub secure_files_download_path: Option<String>,
    pub secure_files_keep_mismatched: Option<String>,
}

/// Values supplied on the command line. Any `Some` wins over the environment.
#[derive(Clone, Debug, Default)]
pub struct SettingsOverrides {
    pub api_url: Option<String>,
    pub project_id: Option<String>,
    pub download_path: Option<String>,
    pub keep_mismatched: bool,
}

impl Settings {
    pub fn apply_overrides(mut self, overrides: SettingsOverrides) -> Self {
        if overrides.api_url.is_some() {
            self.ci_api_v4_url = overrides.api_url;
        }
        if overrides.project_id.is_some() {
            self.ci_project_id = overrides.project_id;
        }
        if overrides.download_path.is_some() {
            self.secure_files_download_path = overrides.download_path;
        }
        if overrides.keep_mismatched {
            self.secure_files_keep_mismatched = Some("true".to_string());
        }
        self
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum AuthToken {
    Job(String),
    Private(String),
}

impl AuthToken {
    pub fn header_name(&self) -> &'static str {
        match self {
            AuthToken::Job(_) => "JOB-TOKEN",
            AuthToken::Private(_) => "PRIVATE-TOKEN",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            AuthToken::Job(token) | AuthToken::Private(token) => token,
        }
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: <redacted>", self.header_name())
    }
}

/// What to do with a downloaded file whose checksum does not match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MismatchPolicy {
    #[default]
    Remove,
    Keep,
}

/// Everything a run needs, fixed at startup and shared read-only.
#[derive(Clone, Debug)]
pub struct DownloadContext {
    /// API base URL without a trailing slash.
    pub api_url: String,
    /// Project identifier, already escaped for use as a path segment.
    pub project_id: String,
    pub auth: AuthToken,
    /// Absolute directory every secure file is written under.
    pub download_root: PathBuf,
    pub working_directory: PathBuf,
    pub mismatch_policy: MismatchPolicy,
}
