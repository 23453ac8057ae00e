//! Serve command handler
//!
//! Handles the serve command including dry-run validation and server startup.

use crate::config::{Environment, ListenType, Settings};
use crate::error::AppResult;
use crate::server::Server;

/// Handler for the serve command
pub struct ServeCommandHandler {
    config: Settings,
    environment: Environment,
}

impl ServeCommandHandler {
    pub fn new(config: Settings, environment: Environment) -> Self {
        Self {
            config,
            environment,
        }
    }

    /// Runs the server, or only checks the configuration when `dry_run` is set.
    ///
    /// # Errors
    /// - Configuration validation errors
    /// - Database bootstrap or server runtime errors (if not dry-run)
    pub async fn execute(self, dry_run: bool) -> anyhow::Result<()> {
        if dry_run {
            self.validate_only()?;
            return Ok(());
        }

        Server::new(self.config, self.environment).run().await
    }

    /// Validates configuration without touching the network.
    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;

        println!("✓ Configuration is valid ({} environment)", self.environment);
        match self.config.server.listen {
            ListenType::Tcp => println!("✓ Server would bind to: {}", self.config.server.address()),
            ListenType::Unix => println!(
                "✓ Server would listen on socket: {}",
                self.config.server.socket_path
            ),
        }
        println!(
            "✓ Database target: {}",
            self.config.database.credentials().redacted_url()
        );
        println!(
            "✓ Bootstrap: up to {} attempt(s), {}s each",
            self.config.database.retry_policy().attempts(),
            self.config.database.attempt_timeout
        );
        println!("Dry run completed successfully - configuration is ready for deployment");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
