//! Unified error handling for the core.
//!
//! One root error type wrapping domain and application errors, with
//! user-actionable suggestions and display categories for the CLI.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for core operations.
#[derive(Debug, Error, Clone)]
pub enum DraftloomError {
    /// Errors from the domain layer (engine contract violations, invalid
    /// assignments, failed lookups).
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (stores, rendering, execution).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Unexpected internal errors (bugs).
    #[error("internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl DraftloomError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Internal { .. } => vec![
                "This appears to be a bug in draftloom".into(),
                "Please report it with the command you ran".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}

/// Convenient result type alias.
pub type DraftloomResult<T> = Result<T, DraftloomError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error, folding it into an internal error.
    fn context(self, msg: impl Into<String>) -> DraftloomResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> DraftloomResult<T> {
        self.map_err(|e| DraftloomError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}
