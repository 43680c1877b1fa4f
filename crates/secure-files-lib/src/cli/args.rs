use crate::config::SettingsOverrides;
use clap::{ArgAction, Parser};
use tracing::Level;

#[derive(Debug, Clone)]
pub struct Command {
    pub overrides: SettingsOverrides,
}

pub struct Args {
    pub command: Command,
    pub log_level: Level,
}

#[derive(Debug, Parser)]
#[command(
    name = "download-secure-files",
    version,
    about = "Download a project's CI secure files and verify their checksums"
)]
struct Cli {
    #[arg(
        short = 'v',
        long = "verbose",
        help = "Sets the level of verbosity",
        action = ArgAction::Count
    )]
    verbose: u8,

    #[arg(
        long = "api-url",
        value_name = "URL",
        help = "Overrides the API base URL (default: $CI_API_V4_URL or https://gitlab.com/api/v4)"
    )]
    api_url: Option<String>,

    #[arg(
        short = 'p',
        long = "project-id",
        value_name = "ID",
        help = "Overrides the project ID or path (default: $CI_PROJECT_ID)"
    )]
    project_id: Option<String>,

    #[arg(
        short = 'o',
        long = "download-path",
        value_name = "DIR",
        help = "Overrides the download directory (default: $SECURE_FILES_DOWNLOAD_PATH or .secure_files)"
    )]
    download_path: Option<String>,

    #[arg(
        long = "keep-mismatched",
        help = "Leave files with a bad checksum on disk instead of deleting them"
    )]
    keep_mismatched: bool,
}

pub fn init_tracing(log_level: Level) {
    let mut filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();
    for directive in ["hyper=warn", "hyper_util=warn", "reqwest=warn"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_env_filter(filter)
        .init();
}

pub fn parse_args() -> Args {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    init_tracing(log_level);

    let command = Command {
        overrides: SettingsOverrides {
            api_url: cli.api_url,
            project_id: cli.project_id,
            download_path: cli.download_path,
            keep_mismatched: cli.keep_mismatched,
        },
    };

    Args { command, log_level }
}
