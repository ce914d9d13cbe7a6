use crate::errors::repository::RepositoryError;
use std::fmt;
use thiserror::Error;
use validator::ValidationErrors;

/// A foreign record an order points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    User(String),
    Product(String),
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::User(id) => write!(f, "user {id}"),
            Reference::Product(id) => write!(f, "product {id}"),
        }
    }
}

/// Coarse classification callers branch on instead of matching message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    ReferenceNotFound,
    NotFound,
    StorageFailure,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Reference not found: {0}")]
    ReferenceNotFound(Reference),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage failure while {context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: RepositoryError,
    },
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::InvalidInput(_) => ErrorKind::InvalidInput,
            ServiceError::ReferenceNotFound(_) => ErrorKind::ReferenceNotFound,
            ServiceError::NotFound(_) => ErrorKind::NotFound,
            ServiceError::Storage { .. } => ErrorKind::StorageFailure,
        }
    }

    /// Wraps a repository failure with the step that produced it.
    pub fn storage(context: impl Into<String>) -> impl FnOnce(RepositoryError) -> ServiceError {
        let context = context.into();
        move |source| ServiceError::Storage { context, source }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages = Vec::new();

        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| match error.code.as_ref() {
                        "length" => "invalid length".to_string(),
                        "range" => "value out of range".to_string(),
                        _ => format!("invalid {field}"),
                    });
                messages.push(format!("{field}: {message}"));
            }
        }

        if messages.is_empty() {
            ServiceError::InvalidInput("validation failed".into())
        } else {
            ServiceError::InvalidInput(messages.join("; "))
        }
    }
}
