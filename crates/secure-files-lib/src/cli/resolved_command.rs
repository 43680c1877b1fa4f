use crate::cli::args::Command;
use crate::cli::params::DownloadParams;
use crate::config::{DownloadContext, Settings, load_settings};
use crate::error::SecureFilesError;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum ResolvedCommand {
    Download(DownloadParams),
}

/// Resolves against the process environment and current directory.
pub fn resolve_command(command: Command) -> Result<ResolvedCommand, SecureFilesError> {
    let settings = load_settings()?;
    let working_directory = std::env::current_dir()
        .map_err(|e| SecureFilesError::io(PathBuf::from("."), e))?;

    resolve_command_with(command, settings, working_directory)
}

pub fn resolve_command_with(
    command: Command,
    settings: Settings,
    working_directory: impl Into<PathBuf>,
) -> Result<ResolvedCommand, SecureFilesError> {
    let Command { overrides } = command;

    for (name, value) in [
        ("api-url", &overrides.api_url),
        ("project-id", &overrides.project_id),
        ("download-path", &overrides.download_path),
    ] {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(SecureFilesError::CliArgumentValidation {
                details: format!("{name} must not be empty."),
            });
        }
    }

    let context =
        DownloadContext::from_settings(settings.apply_overrides(overrides), working_directory)?;

    Ok(ResolvedCommand::Download(DownloadParams { context }))
}
