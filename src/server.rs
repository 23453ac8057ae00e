//! Server module for managing HTTP server lifecycle
//!
//! This module handles bootstrap (database connection with retries), binding
//! the configured listener, and graceful shutdown.

use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::api::routes::create_router;
use crate::config::{Environment, ListenType, Settings};
use crate::db::{OpContext, PgConnector, connect};
use crate::state::AppState;

/// HTTP server manager
pub struct Server {
    settings: Settings,
    environment: Environment,
    shutdown: CancellationToken,
}

impl Server {
    pub fn new(settings: Settings, environment: Environment) -> Self {
        Self {
            settings,
            environment,
            shutdown: CancellationToken::new(),
        }
    }

    /// Token that stops the server when cancelled, in addition to Ctrl+C and SIGTERM.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Connects to the database, binds the listener and serves until shutdown.
    ///
    /// # Errors
    /// - Database still unreachable after the configured attempts
    /// - Address or socket binding errors
    /// - Server runtime errors
    pub async fn run(self) -> anyhow::Result<()> {
        self.log_configuration();

        let connector = PgConnector::new(&self.settings.database)?;
        let bootstrap = OpContext::new();
        let stop_bootstrap = bootstrap.clone();
        let shutdown = self.shutdown.clone();
        let watcher = tokio::spawn(async move {
            tokio::select! {
                _ = shutdown_signal(shutdown) => stop_bootstrap.cancel(),
                _ = stop_bootstrap.token().cancelled() => {}
            }
        });

        tracing::info!(
            database = %self.settings.database.credentials().redacted_url(),
            "Connecting to database"
        );
        let pool = connect(&connector, &self.settings.database.retry_policy(), &bootstrap).await;
        // Stop the watcher; a signal during bootstrap has already been handled.
        bootstrap.token().cancel();
        let _ = watcher.await;
        let pool = pool?;

        let request_timeout = Duration::from_secs(self.settings.server.request_timeout);
        let state = AppState::new(pool, self.settings.application.name.clone(), request_timeout);
        let router = create_router(state.clone());
        tracing::info!("Router configured");

        let shutdown = self.shutdown.clone();
        let graceful = {
            let state = state.clone();
            async move {
                shutdown_signal(shutdown).await;
                // In-flight requests get one request timeout to finish before their
                // store operations are cancelled.
                tokio::spawn(async move {
                    tokio::time::sleep(request_timeout).await;
                    state.cancel_operations();
                });
            }
        };

        match self.settings.server.listen {
            ListenType::Tcp => {
                let address = self.settings.server.address();
                let listener = TcpListener::bind(&address).await.map_err(|e| {
                    tracing::error!(error = %e, address = %address, "Failed to bind to address");
                    anyhow::anyhow!("Failed to bind to {}: {}", address, e)
                })?;
                tracing::info!(address = %address, "Server listening");
                axum::serve(listener, router)
                    .with_graceful_shutdown(graceful)
                    .await?;
            }
            ListenType::Unix => {
                serve_unix(&self.settings.server.socket_path, router, graceful).await?;
            }
        }

        state.cancel_operations();
        tracing::info!("Server shutdown complete");
        Ok(())
    }

    fn log_configuration(&self) {
        tracing::info!(
            app_name = %self.settings.application.name,
            app_version = %self.settings.application.version,
            environment = %self.environment,
            "Application starting"
        );
        tracing::info!(
            listen = %self.settings.server.listen_target(),
            request_timeout = self.settings.server.request_timeout,
            keep_alive_timeout = self.settings.server.keep_alive_timeout,
            "Server configuration loaded"
        );
        tracing::info!(
            max_connections = self.settings.database.max_connections,
            min_connections = self.settings.database.min_connections,
            connect_attempts = self.settings.database.connect_attempts,
            attempt_timeout = self.settings.database.attempt_timeout,
            retry_backoff = self.settings.database.retry_backoff,
            "Database configuration loaded"
        );
    }
}

#[cfg(unix)]
async fn serve_unix<F>(socket_path: &str, router: axum::Router, graceful: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    use std::path::Path;
    use tokio::net::UnixListener;

    let path = Path::new(socket_path);
    if path.exists() {
        tracing::warn!(path = %socket_path, "Removing stale socket file");
        std::fs::remove_file(path)
            .with_context(|| format!("Failed to remove stale socket {}", socket_path))?;
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create socket directory {}", parent.display()))?;
    }

    let listener = UnixListener::bind(path).map_err(|e| {
        tracing::error!(error = %e, path = %socket_path, "Failed to bind unix socket");
        anyhow::anyhow!("Failed to bind unix socket {}: {}", socket_path, e)
    })?;
    tracing::info!(path = %socket_path, "Server listening");

    axum::serve(listener, router).with_graceful_shutdown(graceful).await?;

    if let Err(e) = std::fs::remove_file(path) {
        tracing::debug!(error = %e, "Socket file already gone");
    }
    Ok(())
}

#[cfg(not(unix))]
async fn serve_unix<F>(socket_path: &str, _router: axum::Router, _graceful: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    anyhow::bail!("Unix socket listening is not supported on this platform: {}", socket_path)
}

/// Waits for Ctrl+C, SIGTERM or cancellation of `token`.
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
        _ = token.cancelled() => {
            tracing::info!("Shutdown requested, initiating graceful shutdown");
        }
    }
}
