//! Draftloom Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the draftloom
//! pattern-authoring toolchain, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          draftloom-cli (CLI)            │
//! │      (Implements Driving Ports)         │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │     (DraftService, ToolkitService)      │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │  (Stores, Path Resolver, Renderer,      │
//! │   Automation Executor)                  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    draftloom-adapters (Infrastructure)  │
//! │  (InMemoryToolkitStore, FsDraftStore,   │
//! │   ExpressionPathResolver, ...)          │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │  (PatternSchema, ToolkitDefinition,     │
//! │   DraftDefinition and its item tree)    │
//! │        No External Dependencies         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use draftloom_core::{
//!     application::{DraftService, ToolkitService},
//!     domain::DraftDefinition,
//! };
//!
//! // 1. Build services with injected adapters
//! let service = DraftService::new(toolkits, drafts, resolver, executor);
//!
//! // 2. Drive the draft lifecycle
//! let draft = service.create("WebService", Some("billing"))?;
//! service.configure("billing", None, &[("Name".into(), "billing".into())])?;
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        CommandRunOutcome, DraftService, ToolkitInfo, ToolkitService,
        ports::{AutomationExecutor, DraftPathResolver, DraftStore, TextRenderer, ToolkitStore},
    };
    pub use crate::domain::{
        AttributeDataType, AttributeSchema, AttributeValue, AutomationKind, AutomationSchema,
        Cardinality, CompositeSchema, DraftDefinition, DraftItemSchema, DraftTree, ElementSchema,
        LazyItemMap, NodeId, PatternSchema, SchemaKind, ToolkitDefinition, ToolkitVersion,
        ValidationResults,
    };
    pub use crate::error::{DraftloomError, DraftloomResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
