// ============================================================================
// domain/error.rs - DOMAIN ERROR TAXONOMY
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// One error kind per failure class of the draft tree engine. Validation
/// failures and migration aborts are *not* errors — they come back as
/// `ValidationResults` / `DraftUpgradeResult` values.
///
/// All errors are:
/// - Cloneable (for retry logic)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Structural misuse (programming-contract violations)
    // ========================================================================
    #[error("operation '{operation}' is not valid on '{path}' ({kind})")]
    StructuralMisuse {
        operation: &'static str,
        path: String,
        kind: &'static str,
    },

    #[error("the pattern root cannot be materialised or unmaterialised")]
    RootImmutable,

    #[error("item '{name}' has no parent; ancestry has not been populated")]
    AncestryNotPopulated { name: String },

    // ========================================================================
    // Lookup failures
    // ========================================================================
    #[error("'{owner}' has no property named '{name}'")]
    UnknownProperty { owner: String, name: String },

    #[error("schema '{schema_id}' does not exist in toolkit '{toolkit}'")]
    UnknownSchema { schema_id: String, toolkit: String },

    #[error("'{owner}' has no launchable command named '{name}'")]
    UnknownAutomation { owner: String, name: String },

    #[error("nothing exists at '{expression}'")]
    PathNotFound { expression: String },

    #[error("collection item '{id}' is not an item of '{owner}'")]
    ItemNotFound { id: String, owner: String },

    // ========================================================================
    // Invalid assignment
    // ========================================================================
    #[error("'{value}' is not a valid value for '{name}': {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },

    #[error("'{raw}' is not a valid version; expected 'major.minor.patch'")]
    InvalidVersion { raw: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownProperty { owner, name } => vec![
                format!("'{}' has no property '{}'", owner, name),
                "Use 'draftloom show' to inspect the draft's configuration".into(),
            ],
            Self::PathNotFound { expression } => vec![
                format!("Nothing was found at: {}", expression),
                "Paths look like {Pattern.Element.Attribute}".into(),
                "Collection items are addressed by their id, not their name".into(),
            ],
            Self::UnknownAutomation { owner, .. } => vec![
                format!("'{}' declares no launchable command with that name", owner),
                "Check the toolkit's pattern for available commands".into(),
            ],
            Self::InvalidValue { reason, .. } => vec![
                format!("Value rejected: {}", reason),
                "Check the attribute's data type and allowed choices".into(),
            ],
            Self::AncestryNotPopulated { .. } => vec![
                "The draft was used before ancestry population ran".into(),
                "This is a bug in the calling layer, please report it".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidValue { .. } | Self::InvalidVersion { .. } => ErrorCategory::Validation,
            Self::UnknownProperty { .. }
            | Self::UnknownSchema { .. }
            | Self::UnknownAutomation { .. }
            | Self::PathNotFound { .. }
            | Self::ItemNotFound { .. } => ErrorCategory::NotFound,
            Self::StructuralMisuse { .. }
            | Self::RootImmutable
            | Self::AncestryNotPopulated { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
