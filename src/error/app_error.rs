use crate::error::{DatabaseErrorConverter, StoreAccess};
use serde::Serialize;
use thiserror::Error;

/// Application-wide error type shared by the store, the services and the HTTP layer.
///
/// Store faults always carry the entity kind and the operation that failed so
/// that a log line or a response can be traced back without the raw driver text.
#[derive(Error, Debug)]
pub enum AppError {
    /// The database could not be reached within the configured number of attempts.
    #[error("Could not connect to PostgreSQL after {attempts} attempt(s)")]
    Connection {
        attempts: u32,
        #[source]
        source: anyhow::Error,
    },

    /// A single-entity lookup matched no row.
    #[error("Resource not found: {entity} with {field}={value}")]
    NotFound {
        entity: String,
        field: String,
        value: String,
    },

    /// Unique constraint violation.
    #[error("Duplicate entry: {entity}.{field} = '{value}' already exists")]
    Duplicate {
        entity: String,
        field: String,
        value: String,
    },

    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Request body failed declarative validation on one or more fields.
    #[error("Validation failed on {} field(s)", errors.len())]
    ValidationErrors { errors: Vec<ValidationFieldError> },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// A query against the store failed.
    #[error("Failed to read {entity}: {operation}")]
    Read {
        entity: String,
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// A statement that mutates the store failed.
    #[error("Failed to write {entity}: {operation}")]
    Write {
        entity: String,
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Connection pool error")]
    ConnectionPool {
        #[source]
        source: anyhow::Error,
    },

    /// The caller cancelled the operation before it completed.
    #[error("Operation cancelled: {operation}")]
    Cancelled { operation: String },

    /// The caller's deadline passed before the operation completed.
    #[error("Deadline exceeded: {operation}")]
    DeadlineExceeded { operation: String },

    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

/// One failed field of a validated request body.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidationFieldError {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl AppError {
    pub fn not_found(entity: &str, id: &str) -> Self {
        AppError::NotFound {
            entity: entity.to_string(),
            field: "id".to_string(),
            value: id.to_string(),
        }
    }

    pub fn read(entity: &str, operation: &str, source: impl Into<anyhow::Error>) -> Self {
        AppError::Read {
            entity: entity.to_string(),
            operation: operation.to_string(),
            source: source.into(),
        }
    }

    pub fn write(entity: &str, operation: &str, source: impl Into<anyhow::Error>) -> Self {
        AppError::Write {
            entity: entity.to_string(),
            operation: operation.to_string(),
            source: source.into(),
        }
    }

    /// Wraps a diesel error raised while running `operation` on `entity`.
    pub fn from_store(
        error: diesel::result::Error,
        access: StoreAccess,
        entity: &str,
        operation: &str,
    ) -> Self {
        DatabaseErrorConverter::convert_diesel_error(error, access, entity, operation)
    }

    /// True for errors caused by the caller's input rather than by the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::NotFound { .. }
                | AppError::Duplicate { .. }
                | AppError::Validation { .. }
                | AppError::ValidationErrors { .. }
                | AppError::BadRequest { .. }
        )
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<bb8::RunError<diesel_async::pooled_connection::PoolError>> for AppError {
    fn from(error: bb8::RunError<diesel_async::pooled_connection::PoolError>) -> Self {
        AppError::ConnectionPool {
            source: anyhow::Error::from(error),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<ValidationFieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| ValidationFieldError {
                    field: field.to_string(),
                    code: err.code.to_string(),
                    message: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid value for {}", field)),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::ValidationErrors { errors: fields }
    }
}

impl From<crate::config::ConfigError> for AppError {
    fn from(error: crate::config::ConfigError) -> Self {
        AppError::Configuration {
            key: error.key().unwrap_or("settings").to_string(),
            source: anyhow::Error::from(error),
        }
    }
}

impl From<crate::logger::LoggerError> for AppError {
    fn from(error: crate::logger::LoggerError) -> Self {
        AppError::Configuration {
            key: "logger".to_string(),
            source: anyhow::Error::from(error),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
