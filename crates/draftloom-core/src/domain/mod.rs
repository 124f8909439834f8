//! Core domain layer.
//!
//! Pure pattern/toolkit/draft logic with no I/O: schema definitions,
//! versioned toolkit snapshots, and the draft instance engine. Everything
//! here is synchronous, Clone + PartialEq, and talks to the outside world
//! only through the ports in `crate::application`.

pub mod draft;
pub mod error;
pub mod schema;
pub mod toolkit;

pub use draft::{
    ArtifactLink, ChangeKind, CommandExecutableContext, CommandPreparation, ConfigValue,
    DraftDefinition, DraftItem, DraftItemSchema, DraftTree, DraftUpgradeResult, DraftVisitor,
    LazyItemMap, LazyItemSeq, MigrationChange, NodeId, ProjectionOptions, SchemaKind,
    ValidationResults, ValidationViolation,
};
pub use error::{DomainError, ErrorCategory};
pub use schema::{
    AttributeDataType, AttributeSchema, AttributeValue, AutomationKind, AutomationSchema,
    Cardinality, CodeTemplateSchema, CompositeSchema, ElementSchema, PatternSchema,
};
pub use toolkit::{ToolkitDefinition, ToolkitVersion};
