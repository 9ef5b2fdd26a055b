use crate::config::ConfigError;
use crate::error::DatabaseErrorConverter;
use thiserror::Error;

/// Application-wide error type.
///
/// The first three variants form the domain taxonomy surfaced to API callers.
/// The remaining variants describe infrastructure failures; they reach callers
/// through the catch-all mapping at the HTTP boundary.
#[derive(Error, Debug)]
pub enum AppError {
    /// One or more field or semantic violations
    #[error("{}", messages.join(" "))]
    InvalidArgument { messages: Vec<String> },

    /// The referenced record does not exist
    #[error("{message}")]
    NotFound { message: String },

    /// A uniqueness rule rejected the write
    #[error("{message}")]
    AlreadyExists { message: String },

    /// Unique constraint violation reported by the storage backend
    #[error("Duplicate entry: {entity}.{field} = '{value}' already exists")]
    Duplicate {
        entity: String,
        field: String,
        value: String,
    },

    /// Malformed request that never reached the service layer
    #[error("{message}")]
    BadRequest { message: String },

    /// Database operation error with operation context
    #[error("Database operation failed: {operation}")]
    Database {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Connection pool error
    #[error("Connection pool error")]
    ConnectionPool {
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        AppError::InvalidArgument {
            messages: vec![message.into()],
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound {
            message: message.into(),
        }
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        AppError::AlreadyExists {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
        }
    }

    /// Human-readable messages for the error envelope.
    ///
    /// Violations are reported one per entry. Infrastructure errors carry
    /// their source chain so the caller sees the underlying cause.
    pub fn messages(&self) -> Vec<String> {
        match self {
            AppError::InvalidArgument { messages } => messages.clone(),
            AppError::Database { source, .. }
            | AppError::Configuration { source, .. }
            | AppError::ConnectionPool { source }
            | AppError::Internal { source } => vec![format!("{}: {:#}", self, source)],
            _ => vec![self.to_string()],
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(error: diesel::result::Error) -> Self {
        DatabaseErrorConverter::convert_diesel_error(error, "database operation")
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        AppError::Configuration {
            key: error.key().to_string(),
            source: anyhow::Error::from(error),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    /// Collects field violations, ordered by field name so responses are stable.
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let messages = fields
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    error
                        .message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| format!("Invalid value for '{}'.", field))
                })
            })
            .collect();

        AppError::InvalidArgument { messages }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
