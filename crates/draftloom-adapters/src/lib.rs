//! Infrastructure adapters for draftloom.
//!
//! This crate implements the ports defined in
//! `draftloom-core::application::ports`. It contains all external
//! dependencies and I/O operations.

pub mod automation;
pub mod builtin_toolkits;
pub mod draft_store;
pub mod path_resolver;
pub mod renderer;
pub mod toolkit_store;

// Re-export commonly used adapters
pub use automation::ProcessAutomationExecutor;
pub use draft_store::{FsDraftStore, MemoryDraftStore};
pub use path_resolver::ExpressionPathResolver;
pub use renderer::ProjectionRenderer;
pub use toolkit_store::InMemoryToolkitStore;
