use crate::error::{AppError, ConstraintParser};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// Converts Diesel errors into `AppError` variants.
///
/// Unique violations become `AppError::Duplicate` so callers can tell a
/// conflicting write apart from an outage. Everything else is reported as a
/// database failure for the given operation.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info.as_ref(), operation)
            }
            DieselError::NotFound => AppError::not_found("Record not found"),
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: &(dyn DatabaseErrorInformation + Send + Sync),
        operation: &str,
    ) -> AppError {
        let message = info.message();

        if let DatabaseErrorKind::UniqueViolation = kind {
            // PostgreSQL reports "Key (col)=(val) already exists." as DETAIL,
            // not as part of the primary message.
            let text = match info.details() {
                Some(detail) => format!("{}\n{}", message, detail),
                None => message.to_string(),
            };
            let (entity, field, value) =
                ConstraintParser::parse_unique_violation(&text, info.constraint_name())
                    .unwrap_or_else(|| {
                        (
                            info.table_name().unwrap_or("record").to_string(),
                            info.column_name().unwrap_or("unknown").to_string(),
                            "duplicate_value".to_string(),
                        )
                    });
            return AppError::Duplicate {
                entity,
                field,
                value,
            };
        }

        let label = match kind {
            DatabaseErrorKind::NotNullViolation => "Not null constraint violation",
            DatabaseErrorKind::CheckViolation => "Check constraint violation",
            DatabaseErrorKind::SerializationFailure => "Serialization failure",
            DatabaseErrorKind::ClosedConnection => "Connection closed",
            _ => "Database error",
        };

        AppError::Database {
            operation: operation.to_string(),
            source: anyhow::Error::msg(format!("{}: {}", label, message)),
        }
    }
}
