//! Application layer errors.
//!
//! These errors represent failures in orchestration and infrastructure
//! access, not business logic. Business logic errors are `DomainError`
//! from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// No draft with that name exists in the store.
    #[error("draft '{name}' was not found")]
    DraftNotFound { name: String },

    /// No toolkit with that name is installed.
    #[error("toolkit '{name}' is not installed")]
    ToolkitNotFound { name: String },

    /// A draft with that name already exists.
    #[error("a draft named '{name}' already exists")]
    DraftExists { name: String },

    /// Store access failed (lock poisoned, corrupt file, etc.).
    #[error("store error: {reason}")]
    StoreError { reason: String },

    /// Filesystem operation failed.
    #[error("filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Rendering a code template or text expression failed.
    #[error("rendering failed: {reason}")]
    RenderingFailed { reason: String },

    /// Launching an automation command failed.
    #[error("command '{name}' failed: {reason}")]
    ExecutionFailed { name: String, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::DraftNotFound { name } => vec![
                format!("No draft named '{}'", name),
                "Try: draftloom list to see existing drafts".into(),
                "Or create one with: draftloom new <toolkit> --name <name>".into(),
            ],
            Self::ToolkitNotFound { name } => vec![
                format!("No toolkit named '{}'", name),
                "Try: draftloom toolkits to list what is installed".into(),
            ],
            Self::DraftExists { name } => vec![
                format!("A draft named '{}' already exists", name),
                "Pick a different name".into(),
            ],
            Self::StoreError { .. } => vec![
                "The local store could not be read or written".into(),
                "Check the data directory and try again".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::ExecutionFailed { name, .. } => vec![
                format!("The command '{}' did not complete", name),
                "Check the command's own output above".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DraftNotFound { .. } | Self::ToolkitNotFound { .. } => ErrorCategory::NotFound,
            Self::DraftExists { .. } => ErrorCategory::Validation,
            Self::StoreError { .. }
            | Self::FilesystemError { .. }
            | Self::RenderingFailed { .. }
            | Self::ExecutionFailed { .. } => ErrorCategory::Internal,
        }
    }
}
