//! Range and presence checks for every configuration section.

use crate::config::error::ConfigError;
use crate::config::settings::{
    DatabaseConfig, FileSettings, ListenType, LoggerSettings, ServerConfig, Settings,
};

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.listen {
            ListenType::Tcp if self.port == 0 => {
                return Err(ConfigError::validation(
                    "server.port",
                    "Port must be between 1 and 65535.",
                ));
            }
            ListenType::Unix if self.socket_path.trim().is_empty() => {
                return Err(ConfigError::validation(
                    "server.socket_path",
                    "A socket path is required when listen = \"unix\".",
                ));
            }
            _ => {}
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        if self.keep_alive_timeout == 0 {
            return Err(ConfigError::validation(
                "server.keep_alive_timeout",
                "Keep-alive timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl DatabaseConfig {
    /// Presence checks only; reachability is the bootstrap's job.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("database.host", &self.host),
            ("database.username", &self.username),
            ("database.database", &self.database),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::validation(field, "Value must not be empty."));
            }
        }

        if self.port == 0 {
            return Err(ConfigError::validation(
                "database.port",
                "Port must be between 1 and 65535.",
            ));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "Max connections must be greater than 0.",
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::validation(
                "database.min_connections",
                format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            ));
        }

        if self.connect_attempts == 0 {
            return Err(ConfigError::validation(
                "database.connect_attempts",
                "At least one connection attempt is required.",
            ));
        }

        if self.attempt_timeout == 0 {
            return Err(ConfigError::validation(
                "database.attempt_timeout",
                "Attempt timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.file.format",
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// The leading directive must be a plain level; per-target directives may follow.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let head = self.level.split(',').next().unwrap_or_default().trim();
        if !VALID_LOG_LEVELS.contains(&head.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        self.file.validate()
    }
}

impl Settings {
    /// Returns the first failing section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.logger.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: ConfigError) -> String {
        match err {
            ConfigError::ValidationError { field, .. } => field,
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_tcp_requires_port() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert_eq!(field_of(config.validate().unwrap_err()), "server.port");
    }

    #[test]
    fn test_unix_ignores_port_but_needs_path() {
        let config = ServerConfig {
            port: 0,
            listen: ListenType::Unix,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let config = ServerConfig {
            listen: ListenType::Unix,
            socket_path: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(field_of(config.validate().unwrap_err()), "server.socket_path");
    }

    #[test]
    fn test_server_timeouts() {
        let config = ServerConfig {
            request_timeout: 0,
            ..Default::default()
        };
        assert_eq!(field_of(config.validate().unwrap_err()), "server.request_timeout");

        let config = ServerConfig {
            keep_alive_timeout: 0,
            ..Default::default()
        };
        assert_eq!(field_of(config.validate().unwrap_err()), "server.keep_alive_timeout");
    }

    #[test]
    fn test_database_presence_checks() {
        let config = DatabaseConfig {
            host: String::new(),
            ..Default::default()
        };
        assert_eq!(field_of(config.validate().unwrap_err()), "database.host");

        let config = DatabaseConfig {
            database: " ".to_string(),
            ..Default::default()
        };
        assert_eq!(field_of(config.validate().unwrap_err()), "database.database");
    }

    #[test]
    fn test_database_pool_bounds() {
        let config = DatabaseConfig {
            min_connections: 20,
            max_connections: 5,
            ..Default::default()
        };
        assert_eq!(field_of(config.validate().unwrap_err()), "database.min_connections");

        let config = DatabaseConfig {
            max_connections: 0,
            ..Default::default()
        };
        assert_eq!(field_of(config.validate().unwrap_err()), "database.max_connections");
    }

    #[test]
    fn test_database_bootstrap_bounds() {
        let config = DatabaseConfig {
            connect_attempts: 0,
            ..Default::default()
        };
        assert_eq!(field_of(config.validate().unwrap_err()), "database.connect_attempts");

        let config = DatabaseConfig {
            attempt_timeout: 0,
            ..Default::default()
        };
        assert_eq!(field_of(config.validate().unwrap_err()), "database.attempt_timeout");

        let config = DatabaseConfig {
            retry_backoff: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_logger_level_and_outputs() {
        let settings = LoggerSettings {
            level: "info,movie_api=trace".to_string(),
            ..Default::default()
        };
        assert!(settings.validate().is_ok());

        let settings = LoggerSettings {
            level: "chatty".to_string(),
            ..Default::default()
        };
        assert_eq!(field_of(settings.validate().unwrap_err()), "logger.level");

        let mut settings = LoggerSettings::default();
        settings.console.enabled = false;
        assert_eq!(field_of(settings.validate().unwrap_err()), "logger");
    }

    #[test]
    fn test_logger_file_checks() {
        let mut settings = LoggerSettings::default();
        settings.file.enabled = true;
        settings.file.path = String::new();
        assert_eq!(field_of(settings.validate().unwrap_err()), "logger.file.path");

        let mut settings = LoggerSettings::default();
        settings.file.format = "yaml".to_string();
        assert_eq!(field_of(settings.validate().unwrap_err()), "logger.file.format");
    }

    #[test]
    fn test_settings_report_first_failing_section() {
        let settings = Settings {
            server: ServerConfig {
                port: 0,
                ..Default::default()
            },
            logger: LoggerSettings {
                level: "chatty".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(field_of(settings.validate().unwrap_err()), "server.port");
    }
}
