//! `check-db`: one run of the bootstrap connection, then exit.

use crate::config::Settings;
use crate::db::{OpContext, PgConnector, connect};
use crate::error::{AppError, AppResult};

pub struct CheckDbCommandHandler {
    config: Settings,
}

impl CheckDbCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Connects with the configured retry policy and reports the outcome.
    ///
    /// Ctrl+C aborts the remaining attempts.
    ///
    /// # Errors
    /// [`AppError::Connection`] when every attempt failed.
    pub async fn execute(&self) -> AppResult<()> {
        let database = &self.config.database;
        let policy = database.retry_policy();
        let target = database.credentials().redacted_url();
        let connector = PgConnector::new(database)?;
        let ctx = OpContext::new();

        tracing::info!(database = %target, max_attempts = policy.attempts(), "Checking database connectivity");

        let outcome = tokio::select! {
            outcome = connect(&connector, &policy, &ctx) => outcome,
            _ = tokio::signal::ctrl_c() => {
                ctx.cancel();
                Err(AppError::Cancelled { operation: "check-db".to_string() })
            }
        };

        match outcome {
            Ok(pool) => {
                let state = pool.state();
                println!("✓ Database reachable at {}", target);
                println!("✓ Pool opened with {} connection(s)", state.connections);
                Ok(())
            }
            Err(e) => {
                println!("✗ Database unreachable at {}: {}", target, e);
                Err(e)
            }
        }
    }
}
