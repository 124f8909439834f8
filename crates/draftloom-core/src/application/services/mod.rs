//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "create a draft" or "run a command".

pub mod draft_service;
pub mod toolkit_service;

pub use draft_service::{CommandRunOutcome, DraftService};
pub use toolkit_service::{ToolkitInfo, ToolkitService};
