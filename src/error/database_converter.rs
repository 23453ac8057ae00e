use crate::error::{AppError, ConstraintParser};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// Whether the failing statement read from or wrote to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreAccess {
    Read,
    Write,
}

/// Turns diesel errors into [`AppError`] variants carrying entity and operation context.
///
/// Constraint violations become input errors (`Duplicate` / `Validation`);
/// everything else is wrapped as `Read` or `Write` so the driver error is
/// kept as the source but never surfaced as the message.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    pub fn convert_diesel_error(
        error: DieselError,
        access: StoreAccess,
        entity: &str,
        operation: &str,
    ) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info, access, entity, operation)
            }
            DieselError::NotFound => AppError::NotFound {
                entity: entity.to_string(),
                field: "id".to_string(),
                value: "unknown".to_string(),
            },
            other => Self::wrap(access, entity, operation, anyhow::Error::from(other)),
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: Box<dyn DatabaseErrorInformation + Send + Sync>,
        access: StoreAccess,
        entity: &str,
        operation: &str,
    ) -> AppError {
        let violation = ConstraintParser::parse(
            info.message(),
            info.details(),
            info.constraint_name(),
            info.table_name(),
            info.column_name(),
        );
        let source = anyhow::anyhow!("{:?}: {}", kind, info.message());

        match (kind, violation.column) {
            (DatabaseErrorKind::UniqueViolation, Some(field)) => AppError::Duplicate {
                entity: violation.table.unwrap_or_else(|| entity.to_string()),
                field,
                value: violation.value.unwrap_or_default(),
            },
            (DatabaseErrorKind::ForeignKeyViolation, Some(field)) => AppError::Validation {
                reason: match violation.value {
                    Some(value) => format!("references a missing row ('{}')", value),
                    None => "references a missing row".to_string(),
                },
                field,
            },
            (DatabaseErrorKind::NotNullViolation, Some(field)) => AppError::Validation {
                field,
                reason: format!("is required for {}", entity),
            },
            (DatabaseErrorKind::CheckViolation, Some(field)) => AppError::Validation {
                field,
                reason: format!("violates a check constraint on {}", entity),
            },
            _ => Self::wrap(access, entity, operation, source),
        }
    }

    fn wrap(access: StoreAccess, entity: &str, operation: &str, source: anyhow::Error) -> AppError {
        match access {
            StoreAccess::Read => AppError::read(entity, operation, source),
            StoreAccess::Write => AppError::write(entity, operation, source),
        }
    }
}
