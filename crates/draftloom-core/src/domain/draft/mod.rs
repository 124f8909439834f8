//! The draft instance engine.
//!
//! Everything about one draft lives here: the arena tree of
//! [`tree::DraftItem`] nodes, the visitor protocol that walks it, and the
//! algorithms built on that protocol (validation, migration, projection),
//! all wrapped by the [`definition::DraftDefinition`] aggregate.

pub mod definition;
pub mod migrate;
pub mod projection;
pub mod tree;
pub mod validate;
pub mod visit;

pub use definition::{CommandExecutableContext, CommandPreparation, DraftDefinition};
pub use migrate::{ChangeKind, DraftUpgradeResult, MigrationChange};
pub use projection::{ConfigValue, LazyItemMap, LazyItemSeq, ProjectionOptions};
pub use tree::{ArtifactLink, DraftItem, DraftItemSchema, DraftTree, NodeId, SchemaKind};
pub use validate::{ValidationResults, ValidationViolation};
pub use visit::{accept, AncestryPopulator, DraftVisitor};
