//! Configuration structures loaded from TOML files and `MOVIE_*` variables.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::db::{DatabaseCredentials, RetryPolicy};
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "movie-api".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_socket_path() -> String {
    "/tmp/movie-api.sock".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_keep_alive_timeout() -> u64 {
    75
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_username() -> String {
    "postgres".to_string()
}

fn default_db_name() -> String {
    "movies".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_connect_attempts() -> u32 {
    5
}

fn default_attempt_timeout() -> u64 {
    5
}

fn default_retry_backoff() -> u64 {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/movie-api.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

// ============================================================================
// Application Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// Server Configuration
// ============================================================================

/// Where the HTTP server accepts connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListenType {
    #[default]
    Tcp,
    Unix,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// `tcp` binds `host:port`; `unix` binds `socket_path`.
    #[serde(default)]
    pub listen: ListenType,

    #[serde(default = "default_socket_path")]
    pub socket_path: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Keep-alive timeout in seconds
    #[serde(default = "default_keep_alive_timeout")]
    pub keep_alive_timeout: u64,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Human-readable listen target for logs.
    pub fn listen_target(&self) -> String {
        match self.listen {
            ListenType::Tcp => self.address(),
            ListenType::Unix => format!("unix:{}", self.socket_path),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            listen: ListenType::default(),
            socket_path: default_socket_path(),
            request_timeout: default_request_timeout(),
            keep_alive_timeout: default_keep_alive_timeout(),
        }
    }
}

// ============================================================================
// Database Configuration
// ============================================================================

/// PostgreSQL connection and bootstrap settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_host")]
    pub host: String,

    #[serde(default = "default_db_port")]
    pub port: u16,

    #[serde(default = "default_db_username")]
    pub username: String,

    /// Usually supplied through `MOVIE_DATABASE__PASSWORD`.
    #[serde(default)]
    pub password: String,

    #[serde(default = "default_db_name")]
    pub database: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Pool checkout timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,

    /// Number of bootstrap attempts before giving up
    #[serde(default = "default_connect_attempts")]
    pub connect_attempts: u32,

    /// Upper bound for one bootstrap attempt, in seconds
    #[serde(default = "default_attempt_timeout")]
    pub attempt_timeout: u64,

    /// Linear backoff unit between attempts, in seconds
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff: u64,
}

impl DatabaseConfig {
    pub fn credentials(&self) -> DatabaseCredentials {
        DatabaseCredentials {
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.connect_attempts,
            attempt_timeout: Duration::from_secs(self.attempt_timeout),
            backoff_unit: Duration::from_secs(self.retry_backoff),
        }
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connection_timeout", &self.connection_timeout)
            .field("connect_attempts", &self.connect_attempts)
            .field("attempt_timeout", &self.attempt_timeout)
            .field("retry_backoff", &self.retry_backoff)
            .finish()
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_db_host(),
            port: default_db_port(),
            username: default_db_username(),
            password: String::new(),
            database: default_db_name(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connection_timeout: default_connection_timeout(),
            connect_attempts: default_connect_attempts(),
            attempt_timeout: default_attempt_timeout(),
            retry_backoff: default_retry_backoff(),
        }
    }
}

// ============================================================================
// Logger Settings
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_path")]
    pub path: String,

    #[serde(default = "default_true")]
    pub append: bool,

    /// "full", "compact" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub console: ConsoleSettings,

    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Converts the file representation into the runtime logger configuration.
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console = ConsoleConfig::new(self.console.enabled, self.console.colored);
        let file = self.file.into_file_config()?;

        LoggerConfig::new(console, file, self.level)
            .map_err(|e| ConfigError::validation("logger", e.to_string()))
    }
}

impl FileSettings {
    pub fn into_file_config(self) -> Result<FileConfig, ConfigError> {
        let format = self
            .format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::validation("logger.file.format", e.to_string()))?;

        FileConfig::new(self.enabled, PathBuf::from(self.path), self.append, format)
            .map_err(|e| ConfigError::validation("logger.file", e.to_string()))
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logger: LoggerSettings,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_server_config() -> impl Strategy<Value = ServerConfig> {
        (
            prop_oneof![Just("127.0.0.1".to_string()), Just("0.0.0.0".to_string())],
            1u16..=65535u16,
            prop_oneof![Just(ListenType::Tcp), Just(ListenType::Unix)],
            "/tmp/[a-z]{1,8}\\.sock",
            1u64..=300u64,
            1u64..=300u64,
        )
            .prop_map(
                |(host, port, listen, socket_path, request_timeout, keep_alive_timeout)| {
                    ServerConfig {
                        host,
                        port,
                        listen,
                        socket_path,
                        request_timeout,
                        keep_alive_timeout,
                    }
                },
            )
    }

    fn arb_database_config() -> impl Strategy<Value = DatabaseConfig> {
        (
            ("[a-z]{1,10}", 1u16..=65535u16, "[a-z]{1,8}", "[a-zA-Z0-9]{0,16}", "[a-z]{1,8}"),
            (1u32..=50u32, 1u32..=10u32, 1u64..=120u64),
            (1u32..=10u32, 1u64..=30u64, 0u64..=5u64),
        )
            .prop_map(
                |(
                    (host, port, username, password, database),
                    (max_connections, min_connections, connection_timeout),
                    (connect_attempts, attempt_timeout, retry_backoff),
                )| DatabaseConfig {
                    host,
                    port,
                    username,
                    password,
                    database,
                    max_connections,
                    min_connections: min_connections.min(max_connections),
                    connection_timeout,
                    connect_attempts,
                    attempt_timeout,
                    retry_backoff,
                },
            )
    }

    fn arb_logger_settings() -> impl Strategy<Value = LoggerSettings> {
        (
            prop_oneof![Just("debug".to_string()), Just("info".to_string())],
            any::<bool>(),
            any::<bool>(),
            prop_oneof![Just("json".to_string()), Just("full".to_string())],
        )
            .prop_map(|(level, colored, file_enabled, format)| LoggerSettings {
                level,
                console: ConsoleSettings {
                    enabled: true,
                    colored,
                },
                file: FileSettings {
                    enabled: file_enabled,
                    format,
                    ..FileSettings::default()
                },
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_settings_survive_toml_round_trip(
            server in arb_server_config(),
            database in arb_database_config(),
            logger in arb_logger_settings(),
        ) {
            let settings = Settings {
                application: ApplicationConfig::default(),
                server,
                database,
                logger,
            };
            let text = toml::to_string(&settings).expect("settings serialize");
            let back: Settings = toml::from_str(&text).expect("settings deserialize");
            prop_assert_eq!(settings, back);
        }
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.application.name, "movie-api");
        assert_eq!(settings.server.address(), "127.0.0.1:8080");
        assert_eq!(settings.server.listen, ListenType::Tcp);
        assert_eq!(settings.database.connect_attempts, 5);
        assert_eq!(settings.database.attempt_timeout, 5);
        assert_eq!(settings.database.retry_backoff, 1);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [server]
            listen = "unix"
            socket_path = "/run/movie.sock"

            [database]
            host = "db"
            password = "s3cret"
            "#,
        )
        .unwrap();

        assert_eq!(settings.server.listen_target(), "unix:/run/movie.sock");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.database.host, "db");
        assert_eq!(settings.database.database, "movies");
    }

    #[test]
    fn test_database_debug_redacts_password() {
        let config = DatabaseConfig {
            password: "hunter2".to_string(),
            ..DatabaseConfig::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_retry_policy_from_config() {
        let config = DatabaseConfig {
            connect_attempts: 3,
            attempt_timeout: 2,
            retry_backoff: 4,
            ..DatabaseConfig::default()
        };
        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.attempt_timeout, Duration::from_secs(2));
        assert_eq!(policy.backoff_unit, Duration::from_secs(4));
        assert_eq!(config.credentials().database, "movies");
    }

    #[test]
    fn test_logger_settings_conversion() {
        let settings = LoggerSettings {
            file: FileSettings {
                enabled: true,
                format: "compact".to_string(),
                ..FileSettings::default()
            },
            ..LoggerSettings::default()
        };
        let config = settings.into_logger_config().unwrap();
        assert_eq!(config.file.format, LogFormat::Compact);
        assert!(config.file.enabled);
    }

    #[test]
    fn test_logger_settings_invalid_format() {
        let settings = LoggerSettings {
            file: FileSettings {
                format: "xml".to_string(),
                ..FileSettings::default()
            },
            ..LoggerSettings::default()
        };
        let err = settings.into_logger_config().unwrap_err();
        assert_eq!(err.key(), Some("logger.file.format"));
    }
}
