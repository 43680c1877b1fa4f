mod args;
mod download;
mod params;
mod resolved_command;

pub use args::{Args, Command, init_tracing, parse_args};
pub use download::run_download;
pub use params::DownloadParams;
pub use resolved_command::{ResolvedCommand, resolve_command, resolve_command_with};
