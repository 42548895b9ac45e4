use std::sync::Arc;

use thiserror::Error;

/// Failures raised by a `BaseCrmStore` implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A UNIQUE constraint rejected the write (e.g. `customers_email_key`).
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl StoreError {
    /// Classify a sqlx error, pulling unique violations out of the generic case.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation {
                    constraint: db_err.constraint().unwrap_or("unknown").to_string(),
                };
            }
        }
        StoreError::Database(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Store result handed to every resolver waiting on the same batch load.
pub type SharedStoreResult<T> = Result<T, Arc<StoreError>>;

/// Caller-facing errors for CRM mutations and queries.
///
/// Every variant except `Store` is caller-correctable input.
#[derive(Error, Debug)]
pub enum CrmError {
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CrmError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        CrmError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        CrmError::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        CrmError::Conflict {
            message: message.into(),
        }
    }

    pub fn email_taken(email: &str) -> Self {
        CrmError::conflict(format!("email already exists: {}", email))
    }

    /// Machine-readable code exposed in GraphQL error extensions.
    pub fn code(&self) -> &'static str {
        match self {
            CrmError::Validation { .. } => "VALIDATION_ERROR",
            CrmError::NotFound { .. } => "NOT_FOUND",
            CrmError::Conflict { .. } => "CONFLICT",
            CrmError::Store(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the caller can fix this by changing the input.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, CrmError::Store(_))
    }
}

pub type CrmResult<T> = Result<T, CrmError>;
