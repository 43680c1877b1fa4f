use secure_files_lib::cli::{ResolvedCommand, parse_args, resolve_command, run_download};

#[tokio::main(flavor = "current_thread")]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = parse_args();
    let command = resolve_command(args.command)?;

    match command {
        ResolvedCommand::Download(params) => {
            run_download(params).await?;
        }
    }

    Ok(())
}
