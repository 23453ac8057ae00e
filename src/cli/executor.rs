//! Command executor for dispatching CLI commands
//!
//! Main entry point once arguments are parsed and settings merged.

use super::handlers::{CheckDbCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::{Environment, Settings};
use crate::error::{AppError, AppResult};

/// Runs the parsed command; no subcommand means `serve`.
///
/// # Errors
/// Returns errors from argument validation or from the command handler
pub async fn execute_command(
    cli: &Cli,
    settings: Settings,
    environment: Environment,
) -> anyhow::Result<()> {
    validate_command_args(cli)?;

    match cli.command_or_default() {
        Commands::Serve { dry_run, .. } => {
            ServeCommandHandler::new(settings, environment)
                .execute(dry_run)
                .await
        }
        Commands::CheckDb { .. } => {
            CheckDbCommandHandler::new(settings).execute().await?;
            Ok(())
        }
    }
}

fn validate_command_args(cli: &Cli) -> AppResult<()> {
    cli.validate().map_err(|msg| AppError::Validation {
        field: "cli_arguments".to_string(),
        reason: msg,
    })?;

    if let Some(Commands::Serve {
        host: Some(host),
        port: Some(port),
        ..
    }) = &cli.command
        && host == "localhost"
        && *port == 80
    {
        tracing::warn!(host = %host, port, "Port 80 on localhost may conflict with other services");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[tokio::test]
    async fn test_execute_serve_dry_run() {
        let cli = Cli::try_parse_from(["movie-api", "serve", "--dry-run"]).unwrap();
        let result = execute_command(&cli, Settings::default(), Environment::Test).await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_command_args() {
        let cli = Cli::try_parse_from(["movie-api", "serve", "--port", "8080"]).unwrap();
        assert!(validate_command_args(&cli).is_ok());
    }

    #[tokio::test]
    async fn test_privileged_wildcard_bind_is_rejected_before_running() {
        let cli = Cli::try_parse_from(["movie-api", "serve", "--host", "0.0.0.0", "--port", "443", "--dry-run"])
            .unwrap();
        let err = execute_command(&cli, Settings::default(), Environment::Test)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::Validation { field, .. }) if field == "cli_arguments"
        ));
    }
}
