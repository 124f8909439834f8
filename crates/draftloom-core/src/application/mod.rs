//! Application layer.
//!
//! This layer contains:
//! - **Services**: use case orchestration (DraftService, ToolkitService)
//! - **Ports**: interface definitions (traits) for external dependencies
//! - **Errors**: application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{CommandRunOutcome, DraftService, ToolkitInfo, ToolkitService};

pub use ports::{
    AutomationExecutor, AutomationOutcome, DraftPathResolver, DraftStore, TextRenderer,
    ToolkitStore,
};

pub use error::ApplicationError;
