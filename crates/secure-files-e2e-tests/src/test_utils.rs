use eyre::Result;
use secure_files_lib::config::{Settings, load_settings_from};
use serde_json::json;
use sha2::{Digest, Sha256};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const PROJECT_ID: &str = "123";

/// A secure file as the mock server should present it.
pub struct MockSecureFile {
    pub id: u64,
    pub name: &'static str,
    pub content: &'static [u8],
    /// Checksum reported by the listing; `None` means the real digest of `content`.
    pub checksum: Option<String>,
}

pub fn sha256_hex(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Mounts the listing endpoint and one download endpoint per file for `project_path`.
pub async fn mount_secure_files(server: &MockServer, project_path: &str, files: &[MockSecureFile]) {
    let listing: Vec<_> = files
        .iter()
        .map(|file| {
            json!({
                "id": file.id,
                "name": file.name,
                "checksum": file
                    .checksum
                    .clone()
                    .unwrap_or_else(|| sha256_hex(file.content)),
                "checksum_algorithm": "sha256",
                "created_at": "2022-02-22T22:22:22.222Z",
                "expires_at": null,
                "metadata": null
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path(format!("/api/v4/projects/{project_path}/secure_files")))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing))
        .mount(server)
        .await;

    for file in files {
        Mock::given(method("GET"))
            .and(path(format!(
                "/api/v4/projects/{project_path}/secure_files/{}/download",
                file.id
            )))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(file.content))
            .mount(server)
            .await;
    }
}

/// Environment a CI job would provide, pointed at `server`.
pub fn ci_environment(server: &MockServer, extra: &[(&str, &str)]) -> Result<Settings> {
    let mut vars: secure_files_lib::config::EnvVars = [
        ("CI_API_V4_URL".to_string(), format!("{}/api/v4", server.uri())),
        ("CI_PROJECT_ID".to_string(), PROJECT_ID.to_string()),
        ("CI_JOB_TOKEN".to_string(), "jobToken".to_string()),
    ]
    .into_iter()
    .collect();
    vars.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));

    Ok(load_settings_from(vars)?)
}

pub fn setup_working_directory() -> Result<TempDir> {
    Ok(tempfile::tempdir()?)
}
