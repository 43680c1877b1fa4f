use secure_files_e2e_tests::{
    MockSecureFile, PROJECT_ID, ci_environment, init_tracing, mount_secure_files,
    setup_working_directory, sha256_hex,
};
use secure_files_lib::SecureFilesError;
use secure_files_lib::cli::{Command, DownloadParams, ResolvedCommand, resolve_command_with, run_download};
use secure_files_lib::config::SettingsOverrides;
use std::path::Path;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn build_download_params(
    server: &MockServer,
    working_directory: &Path,
    extra_env: &[(&str, &str)],
    overrides: SettingsOverrides,
) -> DownloadParams {
    let settings = ci_environment(server, extra_env).expect("Failed to load settings");
    match resolve_command_with(Command { overrides }, settings, working_directory)
        .expect("Failed to resolve download command")
    {
        ResolvedCommand::Download(params) => params,
    }
}

#[tokio::test]
async fn test_download_end_to_end() {
    init_tracing();

    let server = MockServer::start().await;
    mount_secure_files(
        &server,
        PROJECT_ID,
        &[
            MockSecureFile {
                id: 1,
                name: "foo/bar/mockfile.txt",
                content: b"foobar",
                checksum: None,
            },
            MockSecureFile {
                id: 2,
                name: "keystore.jks",
                content: &[0x00, 0xfe, 0xed, 0xfe, 0xed, 0xff],
                checksum: None,
            },
        ],
    )
    .await;

    let temp_dir = setup_working_directory().expect("Failed to setup working directory");
    let params = build_download_params(&server, temp_dir.path(), &[], SettingsOverrides::default());

    let summary = run_download(params).await.expect("Download should succeed");

    let root = temp_dir.path().join(".secure_files");
    assert_eq!(summary.files.len(), 2);
    assert!(root.join("foo/bar").is_dir());
    assert_eq!(
        std::fs::read(root.join("foo/bar/mockfile.txt")).unwrap(),
        b"foobar"
    );
    assert_eq!(
        std::fs::read(root.join("keystore.jks")).unwrap(),
        [0x00, 0xfe, 0xed, 0xfe, 0xed, 0xff]
    );
}

#[tokio::test]
async fn test_download_respects_download_path_and_uppercase_checksum() {
    init_tracing();

    let server = MockServer::start().await;
    mount_secure_files(
        &server,
        PROJECT_ID,
        &[MockSecureFile {
            id: 1,
            name: "cert.p12",
            content: b"foobar",
            checksum: Some(sha256_hex(b"foobar").to_uppercase()),
        }],
    )
    .await;

    let temp_dir = setup_working_directory().expect("Failed to setup working directory");
    let params = build_download_params(
        &server,
        temp_dir.path(),
        &[("SECURE_FILES_DOWNLOAD_PATH", "fixtures/a")],
        SettingsOverrides::default(),
    );

    run_download(params).await.expect("Download should succeed");

    assert_eq!(
        std::fs::read(temp_dir.path().join("fixtures/a/cert.p12")).unwrap(),
        b"foobar"
    );
}

#[tokio::test]
async fn test_download_with_escaped_project_path() {
    init_tracing();

    let server = MockServer::start().await;
    mount_secure_files(
        &server,
        "username%2Fproject",
        &[MockSecureFile {
            id: 5,
            name: "file.txt",
            content: b"content",
            checksum: None,
        }],
    )
    .await;

    let temp_dir = setup_working_directory().expect("Failed to setup working directory");
    let params = build_download_params(
        &server,
        temp_dir.path(),
        &[],
        SettingsOverrides {
            project_id: Some("username/project".to_string()),
            ..Default::default()
        },
    );

    run_download(params).await.expect("Download should succeed");

    assert!(temp_dir.path().join(".secure_files/file.txt").is_file());
}

#[tokio::test]
async fn test_empty_listing_creates_no_directory() {
    init_tracing();

    let server = MockServer::start().await;
    mount_secure_files(&server, PROJECT_ID, &[]).await;

    let temp_dir = setup_working_directory().expect("Failed to setup working directory");
    let params = build_download_params(&server, temp_dir.path(), &[], SettingsOverrides::default());

    let summary = run_download(params).await.expect("Empty listing should succeed");

    assert!(summary.files.is_empty());
    assert!(!temp_dir.path().join(".secure_files").exists());
}

#[tokio::test]
async fn test_checksum_mismatch_fails_run_and_removes_file() {
    init_tracing();

    let server = MockServer::start().await;
    mount_secure_files(
        &server,
        PROJECT_ID,
        &[MockSecureFile {
            id: 1,
            name: "mockfile.txt",
            content: b"foobar",
            checksum: Some("foo".to_string()),
        }],
    )
    .await;

    let temp_dir = setup_working_directory().expect("Failed to setup working directory");
    let params = build_download_params(&server, temp_dir.path(), &[], SettingsOverrides::default());

    let err = run_download(params).await.expect_err("Mismatch should fail the run");

    assert!(matches!(err, SecureFilesError::ChecksumMismatch { .. }));
    assert!(err.to_string().contains("mockfile.txt"));
    assert!(!temp_dir.path().join(".secure_files/mockfile.txt").exists());
}

#[tokio::test]
async fn test_checksum_mismatch_keeps_file_with_override() {
    init_tracing();

    let server = MockServer::start().await;
    mount_secure_files(
        &server,
        PROJECT_ID,
        &[MockSecureFile {
            id: 1,
            name: "mockfile.txt",
            content: b"foobar",
            checksum: Some("foo".to_string()),
        }],
    )
    .await;

    let temp_dir = setup_working_directory().expect("Failed to setup working directory");
    let params = build_download_params(
        &server,
        temp_dir.path(),
        &[],
        SettingsOverrides {
            keep_mismatched: true,
            ..Default::default()
        },
    );

    let err = run_download(params).await.expect_err("Mismatch should fail the run");

    assert!(matches!(err, SecureFilesError::ChecksumMismatch { .. }));
    assert!(temp_dir.path().join(".secure_files/mockfile.txt").is_file());
}

#[tokio::test]
async fn test_traversal_name_aborts_before_any_download() {
    init_tracing();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"/secure_files$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 1, "name": "../../outside.txt", "checksum": sha256_hex(b"x"), "checksum_algorithm": "sha256"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"/download$"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x"))
        .expect(0)
        .mount(&server)
        .await;

    let temp_dir = setup_working_directory().expect("Failed to setup working directory");
    let params = build_download_params(&server, temp_dir.path(), &[], SettingsOverrides::default());

    let err = run_download(params).await.expect_err("Traversal should fail the run");

    assert!(matches!(err, SecureFilesError::PathEscape { .. }));
    assert!(!temp_dir.path().join("outside.txt").exists());
    assert!(
        !temp_dir
            .path()
            .parent()
            .map(|p| p.join("outside.txt").exists())
            .unwrap_or(false)
    );
}

#[tokio::test]
async fn test_listing_error_status_fails_run() {
    init_tracing();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let temp_dir = setup_working_directory().expect("Failed to setup working directory");
    let params = build_download_params(&server, temp_dir.path(), &[], SettingsOverrides::default());

    let err = run_download(params).await.expect_err("Unauthorized should fail the run");

    assert!(matches!(err, SecureFilesError::HttpStatus { .. }));
    assert!(!temp_dir.path().join(".secure_files").exists());
}

#[tokio::test]
async fn test_missing_token_fails_before_any_request() {
    init_tracing();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let settings = ci_environment(&server, &[("CI_JOB_TOKEN", "")]).expect("Failed to load settings");
    let err = resolve_command_with(
        Command {
            overrides: SettingsOverrides::default(),
        },
        settings,
        "/work",
    )
    .expect_err("Missing token should be rejected");

    assert!(matches!(err, SecureFilesError::MissingAuthToken));
}
