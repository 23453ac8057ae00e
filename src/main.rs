use clap::Parser;

use movie_api::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (settings, environment) = cli::load_and_merge_config(&cli)?;
    cli::init_logger_from_settings(&settings)?;

    tracing::debug!(version = movie_api::pkg_version(), "Starting movie-api");

    if let Err(e) = cli::execute_command(&cli, settings, environment).await {
        tracing::error!(error = %format!("{e:#}"), "Command failed");
        return Err(e);
    }
    Ok(())
}
