//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `draftloom-adapters` implement
//! these.
//!
//! - **Driven (Output) Ports**: called by the application, implemented by
//!   infrastructure: `ToolkitStore`, `DraftStore`, `DraftPathResolver`,
//!   `TextRenderer`, `AutomationExecutor`.
//! - **Driving (Input) Ports**: the CLI drives the services directly.

pub mod output;

pub use output::{
    AutomationExecutor, AutomationOutcome, DraftPathResolver, DraftStore, TextRenderer,
    ToolkitStore,
};
